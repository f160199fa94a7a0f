/// CommandChain - grow-only pool of command lists chained by semaphores
///
/// Each frame a batch may flush several times. Every flush records one command
/// list and submits it immediately; GPU execution order is enforced by linking
/// the submissions into a semaphore chain. The first submission of a frame
/// waits on the caller-provided input set, every later submission waits on the
/// signal semaphore of the previous one, and `end` hands the final signal
/// semaphore to the caller so downstream passes can wait on the whole frame.
///
/// Command lists and semaphores are allocated lazily and never freed: the
/// arenas grow to the high-water mark of flushes per frame and are reused
/// from slot 0 on the next `begin`.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::renderer::{
    CommandList, PipelineStage, RenderContext, Semaphore, SubmitDesc,
};

pub struct CommandChain {
    command_lists: Vec<Box<dyn CommandList>>,
    semaphores: Vec<Arc<dyn Semaphore>>,
    /// Next free slot this frame; also the number of submissions made
    cursor: usize,
    /// Held between `begin` and `end`
    context: Option<RenderContext>,
    /// Input wait set for the first submission of the frame
    wait_semaphores: Vec<Arc<dyn Semaphore>>,
}

impl CommandChain {
    /// Create an empty chain; GPU objects are allocated on first use
    pub fn new() -> Self {
        Self {
            command_lists: Vec::new(),
            semaphores: Vec::new(),
            cursor: 0,
            context: None,
            wait_semaphores: Vec::new(),
        }
    }

    /// Whether a frame is currently active
    pub fn is_active(&self) -> bool {
        self.context.is_some()
    }

    /// Number of submissions made this frame
    pub fn submission_count(&self) -> usize {
        self.cursor
    }

    /// Current arena size (high-water mark of submissions in one frame)
    pub fn capacity(&self) -> usize {
        self.command_lists.len()
    }

    /// Start a frame
    ///
    /// # Arguments
    ///
    /// * `context` - Render context, held until `end`
    /// * `wait_semaphores` - Semaphores the first submission must wait on
    pub fn begin(
        &mut self,
        context: &RenderContext,
        wait_semaphores: &[Arc<dyn Semaphore>],
    ) -> Result<()> {
        if self.context.is_some() {
            return Err(Error::AlreadyDrawing);
        }
        self.cursor = 0;
        self.context = Some(context.clone());
        self.wait_semaphores = wait_semaphores.to_vec();
        Ok(())
    }

    /// Record one command list and submit it as the next link of the chain
    ///
    /// Grows the arenas when the frame overruns the high-water mark. If
    /// recording fails nothing is submitted, the error propagates, and the
    /// chain recovers on the next `begin`.
    ///
    /// # Arguments
    ///
    /// * `record_fn` - Records the commands for this submission
    pub fn record<F>(&mut self, record_fn: F) -> Result<()>
    where
        F: FnOnce(&mut dyn CommandList) -> Result<()>,
    {
        let context = match &self.context {
            Some(context) => context.clone(),
            None => return Err(Error::NotDrawing),
        };

        if self.cursor == self.command_lists.len() {
            let mut renderer = context.renderer.lock().unwrap();
            let command_list = renderer.create_command_list()?;
            let semaphore = renderer.create_semaphore()?;
            drop(renderer);
            self.command_lists.push(command_list);
            self.semaphores.push(semaphore);
            crate::engine_debug!(
                "nova2d::CommandChain",
                "Grew submission arena to {} slots",
                self.command_lists.len()
            );
        }

        let command_list = &mut self.command_lists[self.cursor];
        command_list.begin()?;
        record_fn(command_list.as_mut())?;
        command_list.end()?;

        let previous;
        let wait: &[Arc<dyn Semaphore>] = if self.cursor == 0 {
            &self.wait_semaphores
        } else {
            previous = [Arc::clone(&self.semaphores[self.cursor - 1])];
            &previous
        };
        let signal = [Arc::clone(&self.semaphores[self.cursor])];

        context
            .renderer
            .lock()
            .unwrap()
            .submit_to_graphics_queue(SubmitDesc {
                wait_semaphores: wait,
                wait_stage: PipelineStage::VertexInput,
                signal_semaphores: &signal,
                command_list: self.command_lists[self.cursor].as_ref(),
            })?;

        self.cursor += 1;
        Ok(())
    }

    /// End the frame
    ///
    /// # Returns
    ///
    /// The signal semaphore of the last submission, or `None` when the frame
    /// made no submission at all.
    pub fn end(&mut self) -> Result<Option<Arc<dyn Semaphore>>> {
        if self.context.take().is_none() {
            return Err(Error::NotDrawing);
        }
        self.wait_semaphores.clear();
        if self.cursor == 0 {
            Ok(None)
        } else {
            Ok(Some(Arc::clone(&self.semaphores[self.cursor - 1])))
        }
    }
}

impl Default for CommandChain {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "command_chain_tests.rs"]
mod tests;
