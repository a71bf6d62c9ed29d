/// Handle for one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FrameRequest(pub u64);

/// Per-frame callback scheduling supplied by the runtime.
///
/// A fired request is delivered by calling [`crate::SequenceHost::on_frame`]; a cancelled one
/// must never be delivered.
pub trait FrameScheduler {
    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameRequest;
    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&mut self, request: FrameRequest);
}
