//! Repair/gift request tracking feature.
//!
//! Requests carry recipient and contact details, device metadata, a lifecycle
//! status, and optionally one uploaded document; staff attach comments as the
//! work progresses.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/requests/` | Create a request (multipart form, optional file) |
//! | GET | `/requests/` | List requests (offset/limit, newest first) |
//! | GET | `/requests/{id}` | Fetch one request with its comments |
//! | PUT | `/requests/{id}` | Partially update a request |
//! | DELETE | `/requests/{id}` | Delete a request and its comments |
//! | POST | `/requests/{id}/comments/` | Attach a comment |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::RequestService;
