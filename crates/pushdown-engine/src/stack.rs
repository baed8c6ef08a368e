//! The reified call stack
//!
//! [`FrameStack`] is an arena of frames linked to their parents, plus the
//! frontier: the handle of the deepest live frame, the only one allowed to
//! run next. The frontier moves down when a frame calls a child and back up
//! when a child completes, so locating it never walks the stack.
//!
//! Only one path through the tree is ever live (strict depth-first), so the
//! live frames are always the chain from the frontier up to the root, plus
//! at most one completed child whose outcome has not been collected yet.

use crate::failure::{ParseError, ParseResult};
use crate::frame::{Frame, FrameId, FrameState, FrameSummary};
use crate::input::Input;
use crate::procedure::{Procedure, Resume, Step};
use serde::Serialize;
use tracing::{debug, trace};

/// Lifetime counters for the frames of one stack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StackStats {
    pub frames_created: usize,
    pub frames_destroyed: usize,
    /// Deepest frame ever created (root is depth 0)
    pub max_depth: usize,
    /// Number of procedure turns taken
    pub steps: usize,
}

/// Arena of frames with an O(1) frontier
pub struct FrameStack<T, V> {
    slots: Vec<Option<Frame<T, V>>>,
    free: Vec<usize>,
    root: FrameId,
    frontier: FrameId,
    max_depth: Option<usize>,
    trace_frames: bool,
    stats: StackStats,
}

impl<T, V> FrameStack<T, V> {
    /// Create a stack holding only the (not yet started) root frame
    pub fn new(root: Box<dyn Procedure<T, V>>) -> Self {
        let name = root.name();
        let stack = Self {
            slots: vec![Some(Frame::new(root, None, 0))],
            free: Vec::new(),
            root: FrameId(0),
            frontier: FrameId(0),
            max_depth: None,
            trace_frames: false,
            stats: StackStats {
                frames_created: 1,
                ..StackStats::default()
            },
        };
        debug!(target: "pushdown::stack", procedure = name, "root frame created");
        stack
    }

    /// Limit how deep child frames may be nested
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.max_depth = max_depth;
    }

    /// Emit a trace event for every procedure turn
    pub fn set_trace_frames(&mut self, enabled: bool) {
        self.trace_frames = enabled;
    }

    pub fn root(&self) -> FrameId {
        self.root
    }

    pub fn frontier(&self) -> FrameId {
        self.frontier
    }

    pub fn stats(&self) -> StackStats {
        self.stats
    }

    pub fn live_frames(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn state(&self, id: FrameId) -> FrameState {
        self.frame(id).state
    }

    pub fn depth(&self, id: FrameId) -> usize {
        self.frame(id).depth
    }

    pub fn parent(&self, id: FrameId) -> Option<FrameId> {
        self.frame(id).parent
    }

    /// Frames from the frontier up to the root
    pub fn trace(&self) -> Vec<FrameSummary> {
        let mut frames = Vec::new();
        let mut current = Some(self.frontier);
        while let Some(id) = current {
            let frame = self.frame(id);
            frames.push(frame.summary(id));
            current = frame.parent;
        }
        frames
    }

    /// Find the frame that may accept the next token
    ///
    /// Frames that do not need a token are run forward and completed frames
    /// are popped until some frame is suspended awaiting a token. Returns
    /// `None` once the root itself has completed.
    pub fn seek_accepting_frame(&mut self) -> Option<FrameId> {
        let mut current = Some(self.frontier);

        while let Some(id) = current {
            match self.state(id) {
                FrameState::AwaitingToken => return Some(id),
                FrameState::Completed => current = self.parent(id),
                FrameState::Running | FrameState::AwaitingChild => {
                    self.resume(id);
                    current = Some(self.frontier);
                }
            }
        }

        None
    }

    /// Deposit `input` into a frame awaiting a token and resume it
    pub fn deliver(&mut self, id: FrameId, input: Input<T>) {
        if self.trace_frames {
            trace!(
                target: "pushdown::stack",
                frame = %id,
                end = input.is_end(),
                "token delivered"
            );
        }
        self.frame_mut(id).deposit(input);
        self.resume(id);
    }

    /// Read the root outcome; the whole tree must have completed
    pub fn take_root_outcome(&mut self) -> ParseResult<V> {
        let root = self.root;
        self.frame_mut(root).take_outcome()
    }

    /// Give a frame one turn
    fn resume(&mut self, id: FrameId) {
        let frame = self.frame_mut(id);
        let state = frame.state;
        let resume = match state {
            FrameState::Completed => {
                panic!("protocol violation: frame {} resumed after it completed", id)
            }
            FrameState::AwaitingChild => {
                panic!("protocol violation: frame {} resumed while its child is still running", id)
            }
            FrameState::AwaitingToken => {
                let token = frame.take_token();
                frame.state = FrameState::Running;
                Resume::Token(token)
            }
            FrameState::Running => match frame.child.take() {
                Some(child) => match self.collect_child(child) {
                    Ok(value) => Resume::Child(value),
                    Err(err) => {
                        debug!(
                            target: "pushdown::stack",
                            frame = %id,
                            error = %err,
                            "child failed; unwinding"
                        );
                        self.complete(id, Err(err));
                        return;
                    }
                },
                None => {
                    assert!(
                        !frame.started,
                        "protocol violation: frame {} resumed with nothing to resume it",
                        id
                    );
                    frame.started = true;
                    Resume::Start
                }
            },
        };

        self.stats.steps += 1;
        let step = self.frame_mut(id).run(resume);

        if self.trace_frames {
            trace!(
                target: "pushdown::stack",
                frame = %id,
                procedure = self.frame(id).name(),
                step = step.kind(),
                "frame stepped"
            );
        }

        match step {
            Step::AwaitToken => self.frame_mut(id).state = FrameState::AwaitingToken,
            Step::Call(child) => self.spawn(id, child),
            Step::Return(value) => self.complete(id, Ok(value)),
            Step::Fail(err) => self.complete(id, Err(err)),
        }
    }

    /// Register `procedure` as the child of `parent` and make it the frontier
    fn spawn(&mut self, parent: FrameId, procedure: Box<dyn Procedure<T, V>>) {
        let depth = self.frame(parent).depth + 1;

        if let Some(limit) = self.max_depth {
            if depth > limit {
                let err = ParseError::DepthLimitExceeded {
                    depth,
                    limit,
                    procedure: procedure.name(),
                };
                self.complete(parent, Err(err));
                return;
            }
        }

        let name = procedure.name();
        let child = self.alloc(Frame::new(procedure, Some(parent), depth));

        let frame = self.frame_mut(parent);
        frame.state = FrameState::AwaitingChild;
        frame.child = Some(child);
        self.frontier = child;

        self.stats.frames_created += 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);
        debug!(
            target: "pushdown::stack",
            frame = %child,
            parent = %parent,
            depth,
            procedure = name,
            "frame created"
        );
    }

    /// Fix the outcome of `id` and hand control back to its parent
    fn complete(&mut self, id: FrameId, result: ParseResult<V>) {
        let frame = self.frame_mut(id);
        frame.settle(result);
        let failed = frame.is_failed();
        let parent = frame.parent;

        debug!(
            target: "pushdown::stack",
            frame = %id,
            procedure = self.frame(id).name(),
            failed,
            "frame completed"
        );

        if let Some(parent) = parent {
            let frame = self.frame_mut(parent);
            debug_assert_eq!(frame.state, FrameState::AwaitingChild);
            frame.state = FrameState::Running;
            self.frontier = parent;
        }
    }

    /// Read a completed child's outcome and destroy the child
    fn collect_child(&mut self, child: FrameId) -> ParseResult<V> {
        let outcome = self.frame_mut(child).take_outcome();
        self.release(child);
        outcome
    }

    fn alloc(&mut self, frame: Frame<T, V>) -> FrameId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(frame);
                FrameId(index)
            }
            None => {
                self.slots.push(Some(frame));
                FrameId(self.slots.len() - 1)
            }
        }
    }

    fn release(&mut self, id: FrameId) {
        if self.slots[id.0].take().is_some() {
            self.free.push(id.0);
            self.stats.frames_destroyed += 1;
        }
    }

    fn frame(&self, id: FrameId) -> &Frame<T, V> {
        match self.slots.get(id.0) {
            Some(Some(frame)) => frame,
            _ => panic!("frame {} is not live", id),
        }
    }

    fn frame_mut(&mut self, id: FrameId) -> &mut Frame<T, V> {
        match self.slots.get_mut(id.0) {
            Some(Some(frame)) => frame,
            _ => panic!("frame {} is not live", id),
        }
    }
}

impl<T, V> Drop for FrameStack<T, V> {
    /// Destroy every live frame exactly once, children before parents
    fn drop(&mut self) {
        let mut live: Vec<(usize, usize)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|frame| (frame.depth, index)))
            .collect();

        if live.len() > 1 {
            debug!(target: "pushdown::stack", live = live.len(), "tearing down live frames");
        }

        live.sort_unstable_by(|a, b| b.cmp(a));
        for (_, index) in live {
            self.release(FrameId(index));
        }
    }
}
