//=========================================================================
// Frame Timing
//
// One `FrameClock` per render loop; `tick()` once per rendered frame.
//
//=========================================================================

//=== Module Declarations =================================================

mod frame_clock;

//=== Public API ==========================================================

pub use frame_clock::{FrameClock, FrameReport, FrameTime};
