/// Buzzer output sinks.
pub mod audio;
/// Game clock mirroring onto the physical display.
pub mod display_sync;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Key binding table for the control socket.
pub mod input;
/// Command execution against the shared scoreboard.
pub mod scoreboard_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Periodic clock pass while the clocks run.
pub mod tick_scheduler;
/// WebSocket connection and message handling service.
pub mod websocket_service;
