use crate::canvas::{CanvasError, Color, PixelCanvas, PreviousState, SymmetryMode, TRANSPARENT};

// ============================================================================
// DRAW PIXEL COMMAND
// ============================================================================

/// Paint one pixel (and its mirror) with a fixed color.
///
/// Erasing is the same command with [`TRANSPARENT`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawPixel {
    x: i32,
    y: i32,
    color: Color,
    symmetry: SymmetryMode,
    /// Filled by the first `execute`.
    previous: Option<PreviousState>,
}

impl DrawPixel {
    /// Coordinates are not checked here; an out-of-range target fails when
    /// the command is executed.
    pub fn new(x: i32, y: i32, color: Color, symmetry: SymmetryMode) -> Self {
        Self {
            x,
            y,
            color,
            symmetry,
            previous: None,
        }
    }

    pub fn erase(x: i32, y: i32, symmetry: SymmetryMode) -> Self {
        Self::new(x, y, TRANSPARENT, symmetry)
    }

    pub fn previous_state(&self) -> Option<&PreviousState> {
        self.previous.as_ref()
    }

    fn execute(&mut self, canvas: &mut PixelCanvas) -> Result<(), CanvasError> {
        let previous = canvas.symmetric_write(self.x, self.y, self.color, self.symmetry)?;
        log::debug!(
            "Pixel drawn, overwritten: {:?}",
            previous.entries().collect::<Vec<_>>()
        );
        self.previous = Some(previous);
        Ok(())
    }

    fn undo(&self, canvas: &mut PixelCanvas) -> Result<(), CanvasError> {
        match &self.previous {
            Some(previous) => {
                previous.restore(canvas)?;
                log::debug!("Undo restored {:?}", previous.entries().collect::<Vec<_>>());
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn redo(&mut self, canvas: &mut PixelCanvas) -> Result<(), CanvasError> {
        self.execute(canvas)
    }

    fn description(&self) -> String {
        let what = if self.color == TRANSPARENT {
            "Erase".to_string()
        } else {
            let [r, g, b, a] = self.color.0;
            format!("Draw ({r}, {g}, {b}, {a})")
        };
        match self.symmetry {
            SymmetryMode::None => format!("{what} at ({}, {})", self.x, self.y),
            mode => format!("{what} at ({}, {}), {} symmetry", self.x, self.y, mode.label()),
        }
    }
}

// ============================================================================
// COMMAND
// ============================================================================

/// Every undoable edit the editor knows about.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    DrawPixel(DrawPixel),
}

impl Command {
    pub(crate) fn execute(&mut self, canvas: &mut PixelCanvas) -> Result<(), CanvasError> {
        match self {
            Command::DrawPixel(cmd) => cmd.execute(canvas),
        }
    }

    pub(crate) fn undo(&self, canvas: &mut PixelCanvas) -> Result<(), CanvasError> {
        match self {
            Command::DrawPixel(cmd) => cmd.undo(canvas),
        }
    }

    pub(crate) fn redo(&mut self, canvas: &mut PixelCanvas) -> Result<(), CanvasError> {
        match self {
            Command::DrawPixel(cmd) => cmd.redo(canvas),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Command::DrawPixel(cmd) => cmd.description(),
        }
    }
}

impl From<DrawPixel> for Command {
    fn from(cmd: DrawPixel) -> Self {
        Command::DrawPixel(cmd)
    }
}

// ============================================================================
// EDIT HISTORY - undo/redo stacks
// ============================================================================

/// Undo/redo history. Unbounded for the lifetime of the session.
#[derive(Debug, Default)]
pub struct EditHistory {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a new command and record it. Discards the redo chain.
    ///
    /// If the command fails nothing is recorded and the redo chain survives.
    pub fn execute(
        &mut self,
        command: impl Into<Command>,
        canvas: &mut PixelCanvas,
    ) -> Result<(), CanvasError> {
        let mut command = command.into();
        command.execute(canvas)?;
        self.redo_stack.clear();
        self.undo_stack.push(command);
        Ok(())
    }

    /// Revert the most recent command. `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self, canvas: &mut PixelCanvas) -> Result<Option<String>, CanvasError> {
        let Some(command) = self.undo_stack.pop() else {
            return Ok(None);
        };
        if let Err(e) = command.undo(canvas) {
            self.undo_stack.push(command);
            return Err(e);
        }
        let description = command.description();
        self.redo_stack.push(command);
        Ok(Some(description))
    }

    /// Re-apply the most recently undone command. `Ok(None)` when there is nothing to redo.
    pub fn redo(&mut self, canvas: &mut PixelCanvas) -> Result<Option<String>, CanvasError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(None);
        };
        if let Err(e) = command.redo(canvas) {
            self.redo_stack.push(command);
            return Err(e);
        }
        let description = command.description();
        self.undo_stack.push(command);
        Ok(Some(description))
    }
}
