use sea_orm::entity::prelude::*;

/// Registered principal: credentials, role, avatar, reset token, subscription mirror.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// argon2id PHC string.
    pub password_hash: String,
    pub role: i16,
    pub avatar_public_id: String,
    pub avatar_secure_url: String,
    /// SHA-256 hex of the raw reset token.
    pub forget_password_token: Option<String>,
    pub forget_password_expiry: Option<chrono::DateTime<chrono::Utc>>,
    pub subscription_id: Option<String>,
    pub subscription_status: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
