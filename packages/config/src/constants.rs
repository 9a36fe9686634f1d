// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Notewise

// Port Configuration
pub const NOTEWISE_API_PORT: &str = "NOTEWISE_API_PORT";
pub const PORT: &str = "PORT"; // Legacy

// Database Configuration
pub const NOTEWISE_DB_PATH: &str = "NOTEWISE_DB_PATH";

// OpenAI Configuration
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL: &str = "OPENAI_MODEL";

// CORS Configuration
pub const NOTEWISE_CORS_ORIGIN: &str = "NOTEWISE_CORS_ORIGIN";
