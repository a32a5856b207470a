use serenity::model::channel::ReactionType;
use serenity::model::id::EmojiId;
use std::fmt::{self, Display};

const UNNAMED: &str = "_";

/// Splits `name:id` and bare id keys
fn custom_key(key: &str) -> Option<(Option<&str>, u64)> {
    if let Ok(id) = key.parse() {
        return Some((None, id));
    }
    let (name, id) = key.rsplit_once(':')?;
    Some((Some(name).filter(|name| !name.is_empty()), id.parse().ok()?))
}

/// A reaction emoji, either a unicode emoji (only `name` set) or a custom
/// guild emoji (`id` set, `name` usually set).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Emoji {
    pub id: Option<EmojiId>,
    pub name: Option<String>,
    pub animated: bool,
}

impl Emoji {
    pub fn unicode(name: &str) -> Emoji {
        Emoji {
            id: None,
            name: Some(name.to_string()),
            animated: false,
        }
    }

    pub const fn custom(id: EmojiId, name: Option<String>, animated: bool) -> Emoji {
        Emoji {
            id: Some(id),
            name,
            animated,
        }
    }

    /// The emoji a configuration key refers to. Custom emoji are written as
    /// `name:id` or a bare id, the react endpoint wants a name so bare ids
    /// get a placeholder.
    pub fn from_key(key: &str) -> Emoji {
        match custom_key(key) {
            Some((name, id)) => Emoji::custom(
                EmojiId(id),
                Some(name.unwrap_or(UNNAMED).to_string()),
                false,
            ),
            None => Emoji::unicode(key),
        }
    }

    /// True when `key` is either this emoji's id or its name. Configuration
    /// refers to emoji by either.
    pub fn matches(&self, key: &str) -> bool {
        if let (Some(id), Some((_, key_id))) = (self.id, custom_key(key)) {
            return id.0 == key_id;
        }
        self.name.as_deref() == Some(key)
    }

    pub fn reaction_type(&self) -> ReactionType {
        match self.id {
            Some(id) => ReactionType::Custom {
                animated: self.animated,
                id,
                name: self.name.clone(),
            },
            None => ReactionType::Unicode(self.name.clone().unwrap_or_default()),
        }
    }
}

impl From<&ReactionType> for Emoji {
    fn from(reaction: &ReactionType) -> Emoji {
        match reaction {
            ReactionType::Custom { animated, id, name } => {
                Emoji::custom(*id, name.clone(), *animated)
            }
            ReactionType::Unicode(name) => Emoji::unicode(name),
            // serenity may add reaction kinds, treat them as nameless
            _ => Emoji {
                id: None,
                name: None,
                animated: false,
            },
        }
    }
}

impl Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.id, &self.name) {
            (Some(id), name) => {
                let prefix = if self.animated { "a" } else { "" };
                write!(f, "<{prefix}:{}:{id}>", name.as_deref().unwrap_or(UNNAMED))
            }
            (None, Some(name)) => f.write_str(name),
            (None, None) => Ok(()),
        }
    }
}
