use lms_core::config::{list_or, optional, parsed_or, required};

/// API service configuration loaded from environment variables.
#[derive(Clone)]
pub struct ApiConfig {
    /// sea-orm connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// TCP port for the HTTP server (default 5000). Env var: `API_PORT`.
    pub api_port: u16,
    pub jwt_secret: String,
    /// Token and cookie lifetime in seconds (default 7 days). Env var: `JWT_EXPIRY_SECS`.
    pub jwt_expiry_secs: u64,
    pub cookie_domain: Option<String>,
    /// Base URL of the web client; reset links point at `{frontend_url}/reset-password/{token}`.
    pub frontend_url: String,
    pub cors_origins: Vec<String>,
    pub contact_us_email: String,
    pub razorpay_key_id: String,
    pub razorpay_secret: String,
    pub razorpay_plan_id: String,
    /// Amount written on every payment record (default 499). Env var: `SUBSCRIPTION_AMOUNT`.
    pub subscription_amount: i32,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from_email: String,
    /// Gate `GET /courses/{id}/lectures` on an active subscription. Env var:
    /// `LECTURES_REQUIRE_SUBSCRIPTION` (default false).
    pub lectures_require_subscription: bool,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: required("DATABASE_URL"),
            api_port: parsed_or("API_PORT", 5000),
            jwt_secret: required("JWT_SECRET"),
            jwt_expiry_secs: parsed_or("JWT_EXPIRY_SECS", lms_auth_types::cookie::TOKEN_TTL_SECS),
            cookie_domain: optional("COOKIE_DOMAIN"),
            frontend_url: required("FRONTEND_URL"),
            cors_origins: list_or(
                "CORS_ORIGINS",
                &["http://localhost:5173", "http://127.0.0.1:5173"],
            ),
            contact_us_email: required("CONTACT_US_EMAIL"),
            razorpay_key_id: required("RAZORPAY_KEY_ID"),
            razorpay_secret: required("RAZORPAY_SECRET"),
            razorpay_plan_id: required("RAZORPAY_PLAN_ID"),
            subscription_amount: parsed_or("SUBSCRIPTION_AMOUNT", 499),
            cloudinary_cloud_name: required("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: required("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: required("CLOUDINARY_API_SECRET"),
            smtp_host: required("SMTP_HOST"),
            smtp_port: parsed_or("SMTP_PORT", 587),
            smtp_username: optional("SMTP_USERNAME"),
            smtp_password: optional("SMTP_PASSWORD"),
            smtp_from_email: required("SMTP_FROM_EMAIL"),
            lectures_require_subscription: parsed_or("LECTURES_REQUIRE_SUBSCRIPTION", false),
        }
    }
}
