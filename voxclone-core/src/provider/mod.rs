pub mod elevenlabs;
pub mod mock;
pub mod provider;
pub mod types;

pub use elevenlabs::{ElevenLabs, ElevenLabsConfig};
pub use mock::{MockBehavior, MockVoiceProvider};
pub use provider::VoiceProvider;
pub use types::VoiceSettings;
