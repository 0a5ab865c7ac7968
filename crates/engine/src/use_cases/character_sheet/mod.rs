//! Character sheet use cases.

mod damage;
mod details;
mod save;

pub use damage::{ApplyDamage, ApplyDamageError};
pub use details::{CharacterDetails, DetailsError, GenerateCharacterDetails};
pub use save::{SaveCharacter, SaveCharacterError, SaveMode};
