use serenity::builder::CreateEmbed;

pub const PAGE_SIZE: usize = 15;

/// One page of a rendered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    /// `None` when the list is empty, the fail message is shown instead
    pub body: Option<String>,
    pub fail_message: String,
    /// 1-based
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub singular: &'static str,
}

impl Page {
    /// Picks page `requested` (1-based, clamped to the available pages) out
    /// of `lines`
    pub fn new(
        title: String,
        lines: &[String],
        requested: usize,
        singular: &'static str,
        fail_message: &str,
    ) -> Page {
        let total_pages = ((lines.len() + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        let number = requested.clamp(1, total_pages);
        let body = if lines.is_empty() {
            None
        } else {
            let start = (number - 1) * PAGE_SIZE;
            let end = (start + PAGE_SIZE).min(lines.len());
            Some(lines[start..end].join("\n"))
        };

        Page {
            title,
            body,
            fail_message: fail_message.to_string(),
            number,
            total_pages,
            total_items: lines.len(),
            singular,
        }
    }

    pub fn footer(&self) -> String {
        let plural = if self.total_items == 1 { "" } else { "s" };
        format!(
            "Page {}/{} • {} {}{plural}",
            self.number, self.total_pages, self.total_items, self.singular
        )
    }

    pub fn embed<'a>(&self, embed: &'a mut CreateEmbed) -> &'a mut CreateEmbed {
        embed.title(&self.title);
        match &self.body {
            Some(body) => embed.description(body).footer(|footer| footer.text(self.footer())),
            None => embed.description(&self.fail_message),
        }
    }
}
