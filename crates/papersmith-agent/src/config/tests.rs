#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_default_run_sections_in_paper_order() {
        let run = RunConfig::default();
        assert_eq!(run.sections.first().map(String::as_str), Some("Abstract"));
        assert_eq!(run.sections.last().map(String::as_str), Some("Conclusion"));
        assert_eq!(run.sections.len(), 7);
        assert_eq!(run.evidence_per_section, 3);
        assert_eq!(run.max_concurrent_sections, 1);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.run.max_papers, 5);
        assert_eq!(config.ingestion.min_fragment_chars, 50);
        assert_eq!(config.llm.timeout_secs, 120);
        assert_eq!(config.drafting.length_hint, "roughly 2-4 paragraphs");
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let config = Config::from_toml(
            r#"
            [run]
            topic = "Graph Neural Networks"
            sections = ["Abstract", "Conclusion"]

            [llm]
            backend = "ollama"
            model = "llama3:8b"

            [ingestion]
            extra_allowed_domains = ["export.arxiv.org.mirror.example"]
            "#,
        )
        .unwrap();

        assert_eq!(config.run.topic, "Graph Neural Networks");
        assert_eq!(config.run.sections, vec!["Abstract", "Conclusion"]);
        assert_eq!(config.run.max_papers, 5);
        assert_eq!(config.llm.backend, BackendKind::Ollama);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.ingestion.extra_allowed_domains.len(), 1);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Config::from_toml("[llm]\nbackend = \"gemini\"\n").is_err());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config.run.topic, default_topic());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papersmith.toml");
        std::fs::write(&path, "[run\nmax_papers = 'many'").unwrap();
        assert!(Config::load(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_api_key_env_fallback_order() {
        let env = |name: &str| match name {
            "PAPERSMITH_OPENAI_API_KEY" => Some("  ".to_string()),
            "OPENAI_API_KEY" => Some("sk-fallback".to_string()),
            _ => None,
        };
        assert_eq!(api_key_from_env(BackendKind::OpenAi, env), Some("sk-fallback".to_string()));
        assert_eq!(api_key_from_env(BackendKind::Anthropic, env), None);
        assert_eq!(api_key_from_env(BackendKind::Ollama, env), None);
    }

    #[test]
    fn test_anthropic_key_falls_back_to_vendor_env_var() {
        let env = |name: &str| match name {
            "ANTHROPIC_API_KEY" => Some("sk-ant-fallback".to_string()),
            _ => None,
        };
        assert_eq!(api_key_from_env(BackendKind::Anthropic, env), Some("sk-ant-fallback".to_string()));

        let both = |name: &str| match name {
            "PAPERSMITH_ANTHROPIC_API_KEY" => Some("sk-ant-primary".to_string()),
            "ANTHROPIC_API_KEY" => Some("sk-ant-fallback".to_string()),
            _ => None,
        };
        assert_eq!(api_key_from_env(BackendKind::Anthropic, both), Some("sk-ant-primary".to_string()));
        assert_eq!(api_key_from_env(BackendKind::OpenAi, env), None);
    }

    #[test]
    fn test_file_api_key_wins_over_env() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-from-file".to_string());
        let backend = config.backend_config();
        assert_eq!(backend.api_key.as_deref(), Some("sk-from-file"));
        assert_eq!(backend.timeout, Duration::from_secs(120));
    }
}
