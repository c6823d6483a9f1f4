//! Actor-based monitoring hub
//!
//! A single monitor actor owns the alert and event pipeline. It runs as an
//! independent async task and talks to the rest of the system via Tokio channels.
//!
//! ## Architecture Overview
//!
//! ```text
//!     HTTP handlers / WebSocket sessions
//!                  │ MonitorHandle (mpsc commands, oneshot replies)
//!          ┌───────▼────────┐
//!          │  MonitorActor  │◄── interval timer (tick)
//!          │   (Pipeline)   │
//!          └───────┬────────┘
//!                  │ publish
//!        ┌─────────▼──────────┐
//!        │ Broadcast Channel  │ (snapshots, event signals)
//!        └─────────┬──────────┘
//!                  │ subscribe
//!       ┌──────────┼──────────┐
//!       ▼          ▼          ▼
//!   WS client  WS client  Subscription
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: The actor has an mpsc command channel for requests
//! 2. **Signals**: Snapshots and event lifecycle changes fan out over broadcast
//! 3. **Request/Response**: oneshot channels for synchronous queries

pub mod messages;
pub mod monitor;
pub mod publisher;
