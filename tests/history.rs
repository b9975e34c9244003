use image::Rgba;
use keypixel::canvas::{Color, PixelCanvas, SymmetryMode, TRANSPARENT};
use keypixel::components::history::{DrawPixel, EditHistory};
use proptest::prelude::*;

const RED: Color = Rgba([172, 50, 50, 255]);
const BLUE: Color = Rgba([91, 110, 225, 255]);

/// A canvas where every pixel differs, so misplaced restores show up.
fn patterned(width: u32, height: u32) -> PixelCanvas {
    let mut canvas = PixelCanvas::new(width, height).unwrap();
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            canvas.set(x, y, Rgba([x as u8, y as u8, 7, 255])).unwrap();
        }
    }
    canvas
}

#[test]
fn vertical_draw_and_undo_restore_both_pixels() {
    let mut canvas = patterned(10, 10);
    let original = canvas.clone();
    let mut history = EditHistory::new();

    history
        .execute(DrawPixel::new(2, 3, RED, SymmetryMode::Vertical), &mut canvas)
        .unwrap();
    assert_eq!(canvas.get(2, 3).unwrap(), RED);
    assert_eq!(canvas.get(7, 3).unwrap(), RED);

    history.undo(&mut canvas).unwrap();
    assert_eq!(canvas, original);
}

#[test]
fn redo_matches_first_execution() {
    let mut expected = patterned(6, 4);
    let mut canvas = expected.clone();
    let mut history = EditHistory::new();
    let mut reference = EditHistory::new();

    reference
        .execute(DrawPixel::new(1, 1, BLUE, SymmetryMode::Horizontal), &mut expected)
        .unwrap();

    history
        .execute(DrawPixel::new(1, 1, BLUE, SymmetryMode::Horizontal), &mut canvas)
        .unwrap();
    history.undo(&mut canvas).unwrap();
    history.redo(&mut canvas).unwrap();

    assert_eq!(canvas, expected);
}

#[test]
fn new_edit_after_undo_drops_redo_chain() {
    let mut canvas = PixelCanvas::new(4, 4).unwrap();
    let mut history = EditHistory::new();

    history
        .execute(DrawPixel::new(0, 0, RED, SymmetryMode::None), &mut canvas)
        .unwrap();
    history.undo(&mut canvas).unwrap();
    history
        .execute(DrawPixel::new(1, 0, BLUE, SymmetryMode::None), &mut canvas)
        .unwrap();

    assert_eq!(history.redo(&mut canvas).unwrap(), None);
    assert_eq!(canvas.get(0, 0).unwrap(), TRANSPARENT);
    assert_eq!(canvas.get(1, 0).unwrap(), BLUE);
}

#[test]
fn no_symmetry_touches_one_pixel() {
    let mut canvas = patterned(5, 5);
    let before = canvas.clone();
    let mut history = EditHistory::new();

    history
        .execute(DrawPixel::new(3, 2, RED, SymmetryMode::None), &mut canvas)
        .unwrap();

    for y in 0..5 {
        for x in 0..5 {
            if (x, y) != (3, 2) {
                assert_eq!(canvas.get(x, y).unwrap(), before.get(x, y).unwrap());
            }
        }
    }
}

#[test]
fn out_of_bounds_edits_are_rejected_and_not_recorded() {
    let mut canvas = PixelCanvas::new(5, 4).unwrap();
    let mut history = EditHistory::new();

    assert!(canvas.get(5, 0).is_err());
    assert!(canvas.set(-1, 0, RED).is_err());
    assert!(
        history
            .execute(DrawPixel::new(5, 0, RED, SymmetryMode::None), &mut canvas)
            .is_err()
    );
    assert!(
        history
            .execute(DrawPixel::new(-1, 0, RED, SymmetryMode::Vertical), &mut canvas)
            .is_err()
    );

    assert_eq!(canvas, PixelCanvas::new(5, 4).unwrap());
    assert_eq!(history.undo(&mut canvas).unwrap(), None);
}

#[test]
fn empty_history_is_a_no_op() {
    let mut canvas = patterned(3, 3);
    let before = canvas.clone();
    let mut history = EditHistory::default();

    assert_eq!(history.undo(&mut canvas).unwrap(), None);
    assert_eq!(history.redo(&mut canvas).unwrap(), None);
    assert_eq!(canvas, before);
}

#[test]
fn erase_is_undone_like_a_draw() {
    let mut canvas = patterned(4, 4);
    let before = canvas.clone();
    let mut history = EditHistory::new();

    history
        .execute(DrawPixel::erase(0, 1, SymmetryMode::Horizontal), &mut canvas)
        .unwrap();
    assert_eq!(canvas.get(0, 1).unwrap(), TRANSPARENT);
    assert_eq!(canvas.get(0, 2).unwrap(), TRANSPARENT);

    let description = history.undo(&mut canvas).unwrap();
    assert_eq!(
        description.as_deref(),
        Some("Erase at (0, 1), Horizontal symmetry")
    );
    assert_eq!(canvas, before);
}

fn symmetry_from(n: u8) -> SymmetryMode {
    match n {
        0 => SymmetryMode::None,
        1 => SymmetryMode::Horizontal,
        _ => SymmetryMode::Vertical,
    }
}

fn color_from(n: u8) -> Color {
    match n {
        0 => RED,
        1 => BLUE,
        2 => TRANSPARENT,
        _ => Rgba([n, n, n, n]),
    }
}

/// Canvas size plus a list of (x, y, color, symmetry) edits inside it.
fn edits() -> impl Strategy<Value = (u32, u32, Vec<(i32, i32, u8, u8)>)> {
    (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
        (
            Just(w),
            Just(h),
            prop::collection::vec((0..w as i32, 0..h as i32, 0u8..6, 0u8..3), 0..40),
        )
    })
}

proptest! {
    #[test]
    fn undoing_every_edit_restores_the_canvas((w, h, list) in edits()) {
        let mut canvas = patterned(w, h);
        let original = canvas.clone();
        let mut history = EditHistory::new();

        let mut applied = 0;
        for (x, y, c, s) in list {
            // Mirrors can leave odd-sized canvases; those edits are rejected whole.
            let before = canvas.clone();
            match history.execute(DrawPixel::new(x, y, color_from(c), symmetry_from(s)), &mut canvas) {
                Ok(()) => applied += 1,
                Err(_) => prop_assert_eq!(&canvas, &before),
            }
        }
        let edited = canvas.clone();

        for _ in 0..applied {
            prop_assert!(history.undo(&mut canvas).unwrap().is_some());
        }
        prop_assert_eq!(&canvas, &original);
        prop_assert_eq!(history.undo(&mut canvas).unwrap(), None);

        for _ in 0..applied {
            prop_assert!(history.redo(&mut canvas).unwrap().is_some());
        }
        prop_assert_eq!(&canvas, &edited);
        prop_assert_eq!(history.redo(&mut canvas).unwrap(), None);
    }
}
