pub mod flow;
pub mod input;
pub mod session;

pub use flow::ChatBookingFlow;
pub use input::InputParser;
pub use session::{normalize_phone, InMemorySessionStore, RedisSessionStore, SessionStore};
