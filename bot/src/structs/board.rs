use super::SourceMessage;

use serenity::builder::CreateEmbed;
use serenity::model::id::{ChannelId, UserId};
use serenity::model::Timestamp;
use unicode_segmentation::UnicodeSegmentation;

const BOARD_COLOUR: u32 = 0xFFD700;
const MAX_DESCRIPTION: usize = 4000;

/// The text line above a board embed. It only depends on its inputs so
/// rewriting it for an unchanged count leaves the board message unchanged.
pub fn board_content(
    emoji: &str,
    count: u64,
    source_channel: ChannelId,
    author: UserId,
    ping: bool,
) -> String {
    let mut content = format!("**{emoji} {count}** | <#{source_channel}>");
    if ping {
        content.push_str(&format!(" | <@{author}>"));
    }
    content
}

/// Cuts `text` down to at most `max` graphemes, ending it with an ellipsis
/// when anything was dropped
pub fn truncate(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        text.to_string()
    } else {
        format!("{}…", graphemes[..max.saturating_sub(1)].concat())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMessage {
    pub content: String,
    pub author_name: String,
    pub author_icon: String,
    pub description: String,
    pub image: Option<String>,
    pub link: String,
    pub footer: String,
    pub timestamp: Option<Timestamp>,
}

impl BoardMessage {
    pub fn new(source: &SourceMessage, content: String) -> BoardMessage {
        let text = if !source.content.trim().is_empty() {
            source.content.clone()
        } else {
            source
                .embed
                .as_ref()
                .and_then(|embed| embed.description.clone().or_else(|| embed.title.clone()))
                .unwrap_or_default()
        };

        BoardMessage {
            content,
            author_name: source.author.name.clone(),
            author_icon: source.author.avatar.clone(),
            description: truncate(&text, MAX_DESCRIPTION),
            image: source.images.first().cloned(),
            link: source.link.clone(),
            footer: format!("Source: {}", source.id),
            timestamp: source.timestamp,
        }
    }

    pub fn embed<'a>(&self, embed: &'a mut CreateEmbed) -> &'a mut CreateEmbed {
        embed
            .colour(BOARD_COLOUR)
            .author(|author| author.name(&self.author_name).icon_url(&self.author_icon))
            .field("Source", format!("[Jump to message]({})", self.link), false)
            .footer(|footer| footer.text(&self.footer));
        if !self.description.is_empty() {
            embed.description(&self.description);
        }
        if let Some(image) = &self.image {
            embed.image(image);
        }
        if let Some(timestamp) = self.timestamp {
            embed.timestamp(timestamp);
        }
        embed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::source::tests::source;
    use crate::structs::EmbedSummary;

    #[test]
    fn test_board_content_without_ping() {
        assert_eq!(
            board_content("🥔", 5, ChannelId(20), UserId(100), false),
            "**🥔 5** | <#20>"
        );
    }

    #[test]
    fn test_board_content_with_ping() {
        assert_eq!(
            board_content("🥔", 12, ChannelId(20), UserId(100), true),
            "**🥔 12** | <#20> | <@100>"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 4), "abc…");
        // a family emoji is one grapheme made of several chars
        assert_eq!(truncate("👨‍👩‍👧👨‍👩‍👧👨‍👩‍👧", 2), "👨‍👩‍👧…");
    }

    #[test]
    fn test_board_message_uses_content() {
        let msg = BoardMessage::new(&source(Vec::new()), "line".to_string());
        assert_eq!(msg.description, "look at this");
        assert_eq!(msg.footer, "Source: 10");
        assert_eq!(msg.author_name, "spud");
        assert_eq!(msg.image, None);
    }

    #[test]
    fn test_board_message_falls_back_to_embed() {
        let mut src = source(Vec::new());
        src.content = String::new();
        src.embed = Some(EmbedSummary {
            title: Some("title".to_string()),
            description: None,
        });
        src.images = vec!["https://cdn.example/a.png".to_string()];

        let msg = BoardMessage::new(&src, "line".to_string());
        assert_eq!(msg.description, "title");
        assert_eq!(msg.image.as_deref(), Some("https://cdn.example/a.png"));
    }
}
