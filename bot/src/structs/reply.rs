use crate::errors::Result;

use log::info;
use serenity::builder::CreateEmbed;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;

#[derive(Debug)]
pub enum ReplyContents {
    String(String),
    ConstStr(&'static str),
    Embed(CreateEmbed),
}

/// The response to a slash command
#[derive(Debug)]
pub struct Reply {
    contents: ReplyContents,
    ephemeral: bool,
}

impl Reply {
    pub const fn new(message: String) -> Reply {
        Reply {
            contents: ReplyContents::String(message),
            ephemeral: false,
        }
    }

    pub const fn new_const(message: &'static str) -> Reply {
        Reply {
            contents: ReplyContents::ConstStr(message),
            ephemeral: false,
        }
    }

    pub const fn embed(embed: CreateEmbed) -> Reply {
        Reply {
            contents: ReplyContents::Embed(embed),
            ephemeral: false,
        }
    }

    /// Only the user that ran the command will see the reply
    pub fn ephemeral(mut self) -> Reply {
        self.ephemeral = true;
        self
    }

    pub const fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub const fn contents(&self) -> &ReplyContents {
        &self.contents
    }

    pub async fn send(self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        info!(
            "replying to /{} from {}",
            command.data.name, command.user.id
        );
        let ephemeral = self.ephemeral;
        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|data| {
                        match self.contents {
                            ReplyContents::String(inner) => data.content(inner),
                            ReplyContents::ConstStr(inner) => data.content(inner),
                            ReplyContents::Embed(embed) => data.add_embed(embed),
                        };
                        data.ephemeral(ephemeral)
                    })
            })
            .await?;
        Ok(())
    }
}
