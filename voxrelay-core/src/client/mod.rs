//! Client side of voxrelay: turns edits of (text, language, voice) into at
//! most one gateway request per quiescence window and plays the result.

pub mod actor;
pub mod events;
pub mod fetcher;
pub mod mock;
pub mod state;

pub use actor::{ClientActor, ClientActorMessage, ClientConfig};
pub use events::{ClientEvent, EventSender};
pub use fetcher::{FetchError, FetchRequest, HttpFetcher, SynthesisFetcher};
pub use state::ClientState;
