#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{
        app,
        game::models::GameType,
        store::memory::MemoryStore,
        tests::fixtures::{band, memory_state, memory_store, setup_logging, two_question_game},
    };

    fn router(store: &MemoryStore) -> Router {
        app(memory_state(store))
    }

    fn get(uri: &str, player: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(player) = player {
            builder = builder.header("X-Player-ID", player);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_answer(uri: &str, player: &str, question_id: i64, answer_id: i64) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("X-Player-ID", player)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "questionId": question_id, "answerId": answer_id }).to_string(),
            ))
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn state_returns_first_question_without_correctness() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);
        let player = Uuid::new_v4().to_string();

        let (status, body) = send(
            router(&store),
            get(&format!("/api/game/{}", game.id), Some(&player)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"]["id"], 0);
        assert_eq!(body["question"]["text"], "Question 0");
        assert_eq!(body["progress"], json!({ "answered": 0, "total": 2 }));
        assert_eq!(body["gameInfo"]["title"], "Capitals");
        assert!(body.get("result").is_none());

        let options = body["question"]["answerOptions"].as_array().unwrap();
        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|o| o.get("isCorrect").is_none()));
        assert!(options.iter().all(|o| o.get("score").is_none()));
    }

    #[tokio::test]
    async fn missing_player_header_is_bad_request() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);

        let (status, body) =
            send(router(&store), get(&format!("/api/game/{}", game.id), None)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("X-Player-ID"));
    }

    #[tokio::test]
    async fn malformed_player_id_is_bad_request() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);

        let (status, body) = send(
            router(&store),
            get(&format!("/api/game/{}", game.id), Some("not-a-uuid")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid player_id format");
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        setup_logging();
        let store = memory_store(vec![]);
        let player = Uuid::new_v4().to_string();

        let (status, body) = send(
            router(&store),
            get(&format!("/api/game/{}", Uuid::new_v4()), Some(&player)),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn malformed_game_id_is_bad_request() {
        setup_logging();
        let store = memory_store(vec![]);
        let player = Uuid::new_v4().to_string();

        let (status, _) = send(router(&store), get("/api/game/not-a-uuid", Some(&player))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn accept_answer_then_state_advances() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);
        let player = Uuid::new_v4().to_string();
        let uri = format!("/api/game/{}/accept-answer", game.id);

        let (status, body) = send(router(&store), post_answer(&uri, &player, 0, 1)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "isCorrect": true, "explanation": "Explanation 0" })
        );

        let (status, body) = send(router(&store), post_answer(&uri, &player, 1, 1)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isCorrect"], false);

        let (status, body) = send(
            router(&store),
            get(&format!("/api/game/{}", game.id), Some(&player)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("question").is_none());
        assert_eq!(body["result"], json!({ "totalScore": 1, "resultText": "Low" }));
        assert_eq!(body["progress"], json!({ "answered": 2, "total": 2 }));
    }

    #[tokio::test]
    async fn unknown_option_is_a_server_error_with_plain_message() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);
        let player = Uuid::new_v4().to_string();
        let uri = format!("/api/game/{}/accept-answer", game.id);

        let (status, body) = send(router(&store), post_answer(&uri, &player, 0, 99)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Answer option 99 does not belong to question 0"
        );

        let (_, body) = send(
            router(&store),
            get(&format!("/api/game/{}", game.id), Some(&player)),
        )
        .await;
        assert_eq!(body["progress"]["answered"], 0);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);
        let player = Uuid::new_v4().to_string();
        let uri = format!("/api/game/{}/accept-answer", game.id);

        let (status, _) = send(router(&store), post_answer(&uri, &player, 4, 0)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reset_restarts_the_game() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);
        let player = Uuid::new_v4().to_string();

        send(
            router(&store),
            post_answer(
                &format!("/api/game/{}/accept-answer", game.id),
                &player,
                0,
                1,
            ),
        )
        .await;

        let (status, body) = send(
            router(&store),
            get(&format!("/api/game/{}/reset", game.id), Some(&player)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, body) = send(
            router(&store),
            get(&format!("/api/game/{}", game.id), Some(&player)),
        )
        .await;
        assert_eq!(body["question"]["id"], 0);
        assert_eq!(body["progress"]["answered"], 0);
    }

    #[tokio::test]
    async fn daily_game_is_served_without_player() {
        setup_logging();
        let game = two_question_game(GameType::Daily);
        let store = memory_store(vec![game.clone()]);

        let (status, _) = send(router(&store), get("/api/game/daily", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        store.push_daily(game.id).await;

        let (status, body) = send(router(&store), get("/api/game/daily", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "gameId": game.id.to_string() }));
    }

    #[tokio::test]
    async fn health_endpoints_respond() {
        setup_logging();
        let store = memory_store(vec![]);

        let response = router(&store).oneshot(get("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");

        let (status, body) = send(router(&store), get("/health/detailed", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "platform": true, "database": true }));
    }

    #[tokio::test]
    async fn external_identity_maps_to_the_same_player() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);

        let with_source = |request: Request<Body>| {
            let (mut parts, body) = request.into_parts();
            parts.headers.insert("x-source", "telegram".parse().unwrap());
            parts.headers.insert("x-chat-id", "-100200".parse().unwrap());
            parts.headers.insert("x-chat-type", "group".parse().unwrap());
            Request::from_parts(parts, body)
        };

        let (status, _) = send(
            router(&store),
            with_source(post_answer(
                &format!("/api/game/{}/accept-answer", game.id),
                "734221",
                0,
                1,
            )),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            router(&store),
            with_source(get(&format!("/api/game/{}", game.id), Some("734221"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["progress"]["answered"], 1);
    }

    #[tokio::test]
    async fn non_numeric_chat_id_is_bad_request() {
        setup_logging();
        let game = two_question_game(GameType::Classic);
        let store = memory_store(vec![game.clone()]);

        let request = Request::builder()
            .uri(format!("/api/game/{}", game.id))
            .header("X-Player-ID", "734221")
            .header("X-Source", "telegram")
            .header("X-Chat-ID", "general")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(router(&store), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn inconsistent_game_data_is_a_server_error() {
        setup_logging();
        let mut game = two_question_game(GameType::Classic);
        game.score_results = vec![band(0, 1, "Low")];
        let store = memory_store(vec![game.clone()]);
        let player = Uuid::new_v4().to_string();
        let uri = format!("/api/game/{}/accept-answer", game.id);

        send(router(&store), post_answer(&uri, &player, 0, 1)).await;
        send(router(&store), post_answer(&uri, &player, 1, 0)).await;

        let (status, body) = send(
            router(&store),
            get(&format!("/api/game/{}", game.id), Some(&player)),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Game data is inconsistent");
    }
}
