use serenity::model::id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSettings {
    pub user: UserId,
    pub board_pings: bool,
    pub level_up_pings: bool,
    pub weekly_pings: bool,
    pub autoreactions: bool,
}
