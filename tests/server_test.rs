//! Integration tests for the observation/feed HTTP server

#[cfg(feature = "server")]
mod server_tests {
    use moodfeed::config::Config;
    use moodfeed::server::{run, ServerConfig};
    use std::time::Duration;

    /// Keypoint array carrying a smiling mouth at the contract indices.
    fn smiling_keypoints() -> Vec<[f64; 2]> {
        let mut keypoints = vec![[0.0, 0.0]; 309];
        keypoints[78] = [200.0, 240.0];
        keypoints[308] = [280.0, 240.0];
        keypoints[13] = [240.0, 238.0];
        keypoints[14] = [240.0, 238.0];
        keypoints
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let config = ServerConfig::new(0, Config::default());

        // Start server on a random port
        let (addr, shutdown_tx) = run(config).await.expect("Failed to start server");

        // Give server time to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["status"], "ok");
        assert!(body["version"].as_str().is_some());

        // Shutdown server
        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_observe_then_feed() {
        // Short intervals so posts happen within the test.
        let mut engine_config = Config::default();
        engine_config.min_interval = Duration::from_millis(5);
        engine_config.max_interval = Duration::from_millis(10);

        let (addr, shutdown_tx) = run(ServerConfig::new(0, engine_config))
            .await
            .expect("Failed to start server");

        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = reqwest::Client::new();

        // Deliver a smiling frame; offset -2 maps to the window [0.3, 0.5].
        let frame = serde_json::json!({
            "faces": [{ "keypoints": smiling_keypoints() }]
        });
        let response = client
            .post(format!("http://{}/observe", addr))
            .json(&frame)
            .send()
            .await
            .expect("Failed to send observation");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["faces"], 1);

        // Each feed poll is one tick; the first arms the timer, later ones
        // post once their deadline passes.
        let mut last = serde_json::Value::Null;
        for _ in 0..6 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let response = client
                .get(format!("http://{}/feed?width=1280&height=720", addr))
                .send()
                .await
                .expect("Failed to poll feed");
            assert!(response.status().is_success());
            last = response.json().await.expect("Failed to parse JSON");
        }

        // The smile window admits only positive messages from the built-in
        // store, and at least one deadline has fired by now.
        let feed_len = last["feed_len"].as_u64().expect("feed_len missing");
        assert!(feed_len >= 1, "no messages posted: {last}");

        let window_min = last["window"]["min"].as_f64().expect("window missing");
        assert!((0.25..=0.35).contains(&window_min), "window drifted: {last}");

        let entries = last["entries"].as_array().expect("entries missing");
        assert!(!entries.is_empty());
        for entry in entries {
            let sentiment = entry["sentiment"].as_f64().expect("sentiment missing");
            assert!((0.3..=0.5).contains(&sentiment));
        }

        let _ = shutdown_tx.send(());
    }

    #[tokio::test]
    async fn test_feed_before_any_observation_reports_unavailable() {
        let (addr, shutdown_tx) = run(ServerConfig::new(0, Config::default()))
            .await
            .expect("Failed to start server");

        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/feed", addr))
            .send()
            .await
            .expect("Failed to poll feed");
        assert!(response.status().is_success());

        let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["tracking"], "unavailable");
        assert!(body["window"].is_null());
        assert_eq!(body["feed_len"], 0);

        let _ = shutdown_tx.send(());
    }
}
