use serde_json::Value;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::{
    CommandDataOption, CommandDataOptionValue,
};
use serenity::model::id::UserId;

/// A resolved slash command argument
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User { id: UserId, name: String },
}

/// The arguments of one command invocation, by option name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options(Vec<(String, OptionValue)>);

impl Options {
    fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0
            .iter()
            .find(|(option, _)| option == name)
            .map(|(_, value)| value)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(OptionValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(OptionValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(OptionValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn user(&self, name: &str) -> Option<(UserId, &str)> {
        match self.get(name) {
            Some(OptionValue::User { id, name }) => Some((*id, name.as_str())),
            _ => None,
        }
    }

    /// The 1-based `page` argument, pages before the first are the first
    pub fn page(&self) -> usize {
        self.integer("page")
            .map_or(1, |page| usize::try_from(page).unwrap_or(0).max(1))
    }
}

#[cfg(test)]
impl Options {
    pub(crate) fn from_values(values: Vec<(&str, OptionValue)>) -> Options {
        Options(
            values
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

fn resolve(option: &CommandDataOption) -> Option<OptionValue> {
    match option.resolved.as_ref()? {
        CommandDataOptionValue::String(value) => Some(OptionValue::String(value.clone())),
        CommandDataOptionValue::Integer(value) => Some(OptionValue::Integer(*value)),
        CommandDataOptionValue::Boolean(value) => Some(OptionValue::Boolean(*value)),
        CommandDataOptionValue::User(user, member) => Some(OptionValue::User {
            id: user.id,
            name: member
                .as_ref()
                .and_then(|member| member.nick.clone())
                .unwrap_or_else(|| user.name.clone()),
        }),
        _ => None,
    }
}

/// Falls back on the raw json value, users can't be recovered from it
fn raw(value: &Value) -> Option<OptionValue> {
    match value {
        Value::String(value) => Some(OptionValue::String(value.clone())),
        Value::Bool(value) => Some(OptionValue::Boolean(*value)),
        Value::Number(value) => value.as_i64().map(OptionValue::Integer),
        _ => None,
    }
}

impl From<&[CommandDataOption]> for Options {
    fn from(options: &[CommandDataOption]) -> Options {
        Options(
            options
                .iter()
                .filter_map(|option| {
                    let value = resolve(option).or_else(|| raw(option.value.as_ref()?))?;
                    Some((option.name.clone(), value))
                })
                .collect(),
        )
    }
}

/// Name and arguments of the invoked subcommand
pub fn subcommand(options: &[CommandDataOption]) -> Option<(&str, Options)> {
    options
        .iter()
        .find(|option| option.kind == CommandOptionType::SubCommand)
        .map(|option| (option.name.as_str(), Options::from(option.options.as_slice())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        Options(vec![
            ("answer".to_string(), OptionValue::String("Rejected".to_string())),
            ("page".to_string(), OptionValue::Integer(3)),
            ("board-pings".to_string(), OptionValue::Boolean(true)),
            (
                "user".to_string(),
                OptionValue::User {
                    id: UserId(7),
                    name: "spud".to_string(),
                },
            ),
        ])
    }

    #[test]
    fn test_typed_getters() {
        let options = options();
        assert_eq!(options.string("answer"), Some("Rejected"));
        assert_eq!(options.boolean("board-pings"), Some(true));
        assert_eq!(options.user("user"), Some((UserId(7), "spud")));
        assert_eq!(options.page(), 3);
    }

    #[test]
    fn test_wrong_type_or_missing() {
        let options = options();
        assert_eq!(options.string("page"), None);
        assert_eq!(options.boolean("weekly-pings"), None);
        assert_eq!(options.user("answer"), None);
    }

    #[test]
    fn test_raw_values() {
        use serde_json::json;

        assert_eq!(raw(&json!("Rejected")), Some(OptionValue::String("Rejected".to_string())));
        assert_eq!(raw(&json!(true)), Some(OptionValue::Boolean(true)));
        assert_eq!(raw(&json!(2)), Some(OptionValue::Integer(2)));
        assert_eq!(raw(&json!(2.5)), None);
        assert_eq!(raw(&json!(null)), None);
    }

    #[test]
    fn test_page_defaults_to_first() {
        assert_eq!(Options::default().page(), 1);
        let negative = Options(vec![("page".to_string(), OptionValue::Integer(-4))]);
        assert_eq!(negative.page(), 1);
    }
}
