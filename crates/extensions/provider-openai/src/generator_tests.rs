    use super::*;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn completion(content: serde_json::Value) -> String {
        serde_json::json!({
            "id": "chatcmpl-123",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
        .to_string()
    }

    #[test]
    fn test_generator_defaults() {
        let generator = OpenAIGenerator::new("test-key".to_string());
        assert_eq!(generator.id(), "openai");
        assert_eq!(generator.api_url, DEFAULT_API_URL);
        assert_eq!(generator.model, "gpt-4o-mini");
        assert_eq!(generator.max_tokens, 400);
    }

    #[test]
    fn test_builder_overrides() {
        let generator = OpenAIGenerator::with_url("k".to_string(), "https://custom.api/v1".to_string())
            .with_model("gpt-4o")
            .with_max_tokens(128)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(generator.api_url, "https://custom.api/v1");
        assert_eq!(generator.model, "gpt-4o");
        assert_eq!(generator.max_tokens, 128);
        assert_eq!(generator.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_build_request() {
        let generator = OpenAIGenerator::new("key".to_string());
        let request = generator.build_request("Write a reply");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, "user");
        assert_eq!(request.messages[0].content, "Write a reply");
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .and(matchers::header("Authorization", "Bearer test-key"))
            .and(matchers::body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 400,
                "messages": [{"role": "user", "content": "Say hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(completion("Hello back!".into())))
            .expect(1)
            .mount(&mock_server)
            .await;

        let generator = OpenAIGenerator::with_url("test-key".to_string(), mock_server.uri());
        let text = generator.generate("Say hi").await.unwrap();
        assert_eq!(text, "Hello back!");
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mock_server = MockServer::start().await;

        let error_body = r#"{"error": {"message": "Invalid API key", "type": "invalid_request_error"}}"#;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/"))
            .respond_with(ResponseTemplate::new(401).set_body_string(error_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let generator = OpenAIGenerator::with_url("bad-key".to_string(), mock_server.uri());
        match generator.generate("Hello").await.unwrap_err() {
            GenerationError::Api { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Invalid API key"));
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_rate_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
            .mount(&mock_server)
            .await;

        let generator = OpenAIGenerator::with_url("test-key".to_string(), mock_server.uri());
        let err = generator.generate("Hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_generate_null_content_is_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(completion(serde_json::Value::Null)))
            .mount(&mock_server)
            .await;

        let generator = OpenAIGenerator::with_url("test-key".to_string(), mock_server.uri());
        let err = generator.generate("Hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_generate_blank_content_is_empty_response() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(completion("  ".into())))
            .mount(&mock_server)
            .await;

        let generator = OpenAIGenerator::with_url("test-key".to_string(), mock_server.uri());
        assert!(matches!(
            generator.generate("Hello").await,
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
            .mount(&mock_server)
            .await;

        let generator = OpenAIGenerator::with_url("test-key".to_string(), mock_server.uri());
        assert!(matches!(
            generator.generate("Hello").await,
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(completion("late".into()))
                    .set_delay(Duration::from_millis(1500)),
            )
            .mount(&mock_server)
            .await;

        let generator = OpenAIGenerator::with_url("test-key".to_string(), mock_server.uri())
            .with_timeout(Duration::from_millis(200));
        assert!(matches!(
            generator.generate("Hello").await,
            Err(GenerationError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_connection_refused() {
        let generator = OpenAIGenerator::with_url("test-key".to_string(), "http://127.0.0.1:9".to_string());
        assert!(matches!(
            generator.generate("Hello").await,
            Err(GenerationError::Network(_))
        ));
    }
