//! Text-to-speech stage for episode narration.
//!
//! A closed set of speech providers (ElevenLabs, OpenAI TTS, local
//! espeak-ng) behind one `SpeechProvider` trait. The provider list is
//! built once per run by an explicit factory from configuration and
//! tried in order: first success wins, and if every provider fails the
//! error carries each attempt's diagnostic.

pub mod config;
pub mod elevenlabs;
pub mod error;
pub mod espeak;
pub mod factory;
pub mod fallback;
pub mod openai;
pub mod provider;

pub use config::SpeechConfig;
pub use elevenlabs::ElevenLabsProvider;
pub use error::{SpeechError, SpeechResult};
pub use espeak::EspeakProvider;
pub use factory::build_providers;
pub use fallback::synthesize_with_fallback;
pub use openai::OpenAiTtsProvider;
pub use provider::SpeechProvider;
