//! JSON-RPC 2.0 bridge to the page hosting the tunnel.
//!
//! On the web the engine runs inside an iframe and the parent page owns the
//! scroll position. The parent posts input as notifications; the engine posts
//! cue and scene changes back.
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ scroll_progress / pointer_move ─────> │  TunnelInput
//!        ├─ Request (with ID) ──────────────────> │
//!        │ <───────────────── Response (with ID) ─┤
//!        │ <──── cue_changed / scene_changed ─────┤
//! ```
//!
//! ## Incoming methods
//!
//! - `scroll_progress {fraction}`: normalised scroll position in `[0, 1]`
//! - `pointer_move {x, y, width, height}`: pointer in viewport pixels
//! - `user_gesture`: first call unlocks audio
//! - `get_state`: current and target progress, scene and active cue ids
//! - `get_fps`: smoothed frame rate
//!
//! ## Outgoing notifications
//!
//! - `cue_changed {id, visible}`
//! - `scene_changed {scene}`
//! - `fps_update {fps}` every half second
//!
//! Error codes follow JSON-RPC 2.0: `-32601` method not found, `-32602`
//! invalid params, `-32603` internal error. Messages without an `id` never
//! receive a response.

pub mod web_rpc;
