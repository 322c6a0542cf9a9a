pub fn default_model() -> String {
    "gpt-4".to_string()
}

pub fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_temperature() -> f32 {
    0.7
}

pub fn default_max_tokens() -> u32 {
    2000
}

pub fn default_timeout_sec() -> u64 {
    30
}

pub fn default_request_timeout_sec() -> u64 {
    120
}

pub fn default_concurrency() -> usize {
    10
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_base_ms() -> u64 {
    500
}

pub fn default_config_path() -> std::path::PathBuf {
    std::path::PathBuf::from("aita.yaml")
}
