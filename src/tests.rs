#[cfg(test)]
mod integration_tests {
    use crate::config::{bootstrap_superadmin, Settings};
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::{authed, seed_user, setup_test_app, setup_test_server};
    use axum::http::StatusCode;
    use axum_test::multipart::MultipartForm;
    use axum_test::TestServer;
    use model::entities::{student, ticket, user};
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{json, Value};

    async fn create_event(server: &TestServer, token: &str, name: &str) -> i64 {
        let response = authed(server.post("/events"), token)
            .json(&json!({
                "name": name,
                "description": "Annual party",
                "date": "2025-09-20T21:00:00",
                "location": "Main hall"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap()
    }

    async fn create_participant(server: &TestServer, token: &str, event_id: i64, first: &str, last: &str) -> Value {
        let response = authed(server.post(&format!("/events/{}/participants", event_id)), token)
            .json(&json!({
                "first_name": first,
                "last_name": last,
                "promo": "2026",
                "email": format!("{}@school.edu", first.to_lowercase()),
                "tarif": "student"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data
    }

    async fn scan(server: &TestServer, token: &str, qr_token: &str) -> Value {
        let response = authed(server.post("/scan"), token)
            .json(&json!({ "token": qr_token }))
            .await;
        response.assert_status(StatusCode::OK);
        response.json()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_signup_login_and_me() {
        let (server, _state) = setup_test_server().await;

        let response = server
            .post("/auth/signup")
            .json(&json!({"email": "Ada@Example.com", "name": "Ada", "password": "correct-horse"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["email"], "ada@example.com");
        assert_eq!(body.data["is_superadmin"], false);

        let duplicate = server
            .post("/auth/signup")
            .json(&json!({"email": "ada@example.com", "name": "Ada", "password": "correct-horse"}))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
        let error: Value = duplicate.json();
        assert_eq!(error["code"], "CONFLICT");
        assert_eq!(error["success"], false);

        let wrong = server
            .post("/auth/login")
            .json(&json!({"email": "ada@example.com", "password": "wrong-password"}))
            .await;
        wrong.assert_status(StatusCode::UNAUTHORIZED);

        let login = server
            .post("/auth/login")
            .json(&json!({"email": "ada@example.com", "password": "correct-horse"}))
            .await;
        login.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = login.json();
        assert_eq!(body.data["token_type"], "bearer");
        assert_eq!(body.data["expires_in"], 3600);
        let access_token = body.data["access_token"].as_str().unwrap().to_string();

        let me = authed(server.get("/auth/me"), &access_token).await;
        me.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = me.json();
        assert_eq!(body.data["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_payload() {
        let (server, _state) = setup_test_server().await;

        let response = server
            .post("/auth/signup")
            .json(&json!({"email": "not-an-email", "name": "Ada", "password": "short"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let (server, _state) = setup_test_server().await;

        server.get("/students").await.assert_status(StatusCode::UNAUTHORIZED);
        server
            .post("/scan")
            .json(&json!({"token": "abc"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let garbage = authed(server.get("/auth/me"), "not-a-jwt").await;
        garbage.assert_status(StatusCode::UNAUTHORIZED);
        let error: Value = garbage.json();
        assert_eq!(error["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_admin_endpoints_require_superadmin() {
        let (server, state) = setup_test_server().await;
        let (_, user_token) = seed_user(&state, "user@example.com", false).await;
        let (_, admin_token) = seed_user(&state, "root@example.com", true).await;

        let denied = authed(server.get("/admin/users"), &user_token).await;
        denied.assert_status(StatusCode::FORBIDDEN);
        let error: Value = denied.json();
        assert_eq!(error["code"], "PERMISSION_DENIED");

        let listed = authed(server.get("/admin/users"), &admin_token).await;
        listed.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = listed.json();
        assert_eq!(body.data.len(), 2);

        let created = authed(server.post("/admin/users"), &admin_token)
            .json(&json!({
                "email": "staff@example.com",
                "name": "Staff",
                "password": "long-enough",
                "is_superadmin": false
            }))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = created.json();
        let staff_id = body.data["id"].as_i64().unwrap();

        let promoted = authed(
            server.put(&format!("/admin/users/{}/superadmin", staff_id)),
            &admin_token,
        )
        .json(&json!({"is_superadmin": true}))
        .await;
        promoted.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = promoted.json();
        assert_eq!(body.data["is_superadmin"], true);

        let by_user = authed(server.post("/admin/users"), &user_token)
            .json(&json!({"email": "x@example.com", "name": "X", "password": "long-enough"}))
            .await;
        by_user.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_superadmin_bootstrap_is_idempotent() {
        let (_server, state) = setup_test_server().await;
        let settings = Settings {
            database_url: "sqlite::memory:".to_string(),
            bind_address: "127.0.0.1:0".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_minutes: 60,
            superadmin_email: "admin@tdlog.local".to_string(),
            superadmin_password: "bootstrap-password".to_string(),
            superadmin_name: "Super Admin".to_string(),
            internal_email_domains: vec![],
        };

        bootstrap_superadmin(&state.db, &settings).await.unwrap();
        bootstrap_superadmin(&state.db, &settings).await.unwrap();

        let users = user::Entity::find().all(&state.db).await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].is_superadmin);
        assert_eq!(users[0].email, "admin@tdlog.local");
    }

    #[tokio::test]
    async fn test_event_crud_and_permissions() {
        let (server, state) = setup_test_server().await;
        let (owner, owner_token) = seed_user(&state, "owner@example.com", false).await;
        let (_, other_token) = seed_user(&state, "other@example.com", false).await;
        let (_, root_token) = seed_user(&state, "root@example.com", true).await;

        let later = create_event(&server, &owner_token, "Gala").await;
        let earlier = authed(server.post("/events"), &owner_token)
            .json(&json!({"name": "Welcome", "date": "2025-09-01T18:00:00", "location": "Lawn"}))
            .await;
        earlier.assert_status(StatusCode::CREATED);

        let listed = server.get("/events").await;
        listed.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = listed.json();
        let names: Vec<&str> = body.data.iter().map(|e| e["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Welcome", "Gala"]);

        let fetched = server.get(&format!("/events/{}", later)).await;
        fetched.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = fetched.json();
        assert_eq!(body.data["created_by_id"], owner.id);
        assert_eq!(body.data["date"], "2025-09-20T21:00:00");

        server.get("/events/9999").await.assert_status(StatusCode::NOT_FOUND);

        let forbidden = authed(server.put(&format!("/events/{}", later)), &other_token)
            .json(&json!({"name": "Hijacked"}))
            .await;
        forbidden.assert_status(StatusCode::FORBIDDEN);

        let updated = authed(server.put(&format!("/events/{}", later)), &owner_token)
            .json(&json!({"name": "Winter Gala"}))
            .await;
        updated.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = updated.json();
        assert_eq!(body.data["name"], "Winter Gala");
        assert_eq!(body.data["location"], "Main hall");

        authed(server.delete(&format!("/events/{}", later)), &other_token)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let deleted = authed(server.delete(&format!("/events/{}", later)), &root_token).await;
        deleted.assert_status(StatusCode::OK);
        let body: ApiResponse<String> = deleted.json();
        assert_eq!(body.message, "Event deleted successfully");

        server
            .get(&format!("/events/{}", later))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_event_admins() {
        let (server, state) = setup_test_server().await;
        let (owner, owner_token) = seed_user(&state, "owner@example.com", false).await;
        let (helper, helper_token) = seed_user(&state, "helper@example.com", false).await;
        let event_id = create_event(&server, &owner_token, "Gala").await;

        let denied = authed(server.post(&format!("/events/{}/admins", event_id)), &helper_token)
            .json(&json!({"user_id": helper.id}))
            .await;
        denied.assert_status(StatusCode::FORBIDDEN);

        let added = authed(server.post(&format!("/events/{}/admins", event_id)), &owner_token)
            .json(&json!({"user_id": helper.id}))
            .await;
        added.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = added.json();
        assert_eq!(body.data["role"], "ADMIN");
        assert_eq!(body.data["user_email"], "helper@example.com");

        authed(server.post(&format!("/events/{}/admins", event_id)), &owner_token)
            .json(&json!({"user_id": helper.id}))
            .await
            .assert_status(StatusCode::CONFLICT);

        let listed = authed(server.get(&format!("/events/{}/admins", event_id)), &helper_token).await;
        listed.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = listed.json();
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0]["role"], "OWNER");
        assert_eq!(body.data[0]["user_id"], owner.id);
        assert_eq!(body.data[1]["role"], "ADMIN");
    }

    #[tokio::test]
    async fn test_participant_is_its_ticket() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;
        let event_id = create_event(&server, &token, "Gala").await;

        let participant = create_participant(&server, &token, event_id, "Ada", "Lovelace").await;
        assert_eq!(participant["status"], "UNUSED");
        let qr = participant["qr_code_token"].as_str().unwrap().to_string();
        assert_eq!(qr.len(), 22);

        let tickets = authed(server.get(&format!("/events/{}/tickets", event_id)), &token).await;
        tickets.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = tickets.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["qr_code_token"], qr.as_str());
        assert_eq!(body.data[0]["user_name"], "Ada Lovelace");
        assert_eq!(body.data[0]["user_email"], "ada@school.edu");
        assert_eq!(body.data[0]["status"], "UNUSED");

        let pid = participant["id"].as_i64().unwrap();
        let updated = authed(
            server.put(&format!("/events/{}/participants/{}", event_id, pid)),
            &token,
        )
        .json(&json!({"last_name": "King", "email": "ada.king@school.edu"}))
        .await;
        updated.assert_status(StatusCode::OK);

        let tickets = authed(server.get(&format!("/events/{}/tickets", event_id)), &token).await;
        let body: ApiResponse<Vec<Value>> = tickets.json();
        assert_eq!(body.data[0]["user_name"], "Ada King");
        assert_eq!(body.data[0]["user_email"], "ada.king@school.edu");
        assert_eq!(body.data[0]["qr_code_token"], qr.as_str());

        authed(
            server.delete(&format!("/events/{}/participants/{}", event_id, pid)),
            &token,
        )
        .await
        .assert_status(StatusCode::OK);

        let tickets = authed(server.get(&format!("/events/{}/tickets", event_id)), &token).await;
        let body: ApiResponse<Vec<Value>> = tickets.json();
        assert!(body.data.is_empty());
        let participants =
            authed(server.get(&format!("/events/{}/participants", event_id)), &token).await;
        let body: ApiResponse<Vec<Value>> = participants.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_participants_ordered_and_scoped_to_event() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;
        let gala = create_event(&server, &token, "Gala").await;
        let other = create_event(&server, &token, "Other").await;

        create_participant(&server, &token, gala, "Grace", "Hopper").await;
        let ada = create_participant(&server, &token, gala, "Ada", "Byron").await;
        create_participant(&server, &token, other, "Alan", "Turing").await;

        let listed = authed(server.get(&format!("/events/{}/participants", gala)), &token).await;
        let body: ApiResponse<Vec<Value>> = listed.json();
        let last_names: Vec<&str> = body
            .data
            .iter()
            .map(|p| p["last_name"].as_str().unwrap())
            .collect();
        assert_eq!(last_names, vec!["Byron", "Hopper"]);

        // Participant ids are only addressable through their own event
        authed(
            server.delete(&format!("/events/{}/participants/{}", other, ada["id"])),
            &token,
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);

        authed(
            server
                .post("/events/9999/participants")
                .json(&json!({"first_name": "No", "last_name": "Event"})),
            &token,
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ticket_creation_shows_in_participants() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;
        let event_id = create_event(&server, &token, "Gala").await;

        let created = authed(server.post(&format!("/events/{}/tickets", event_id)), &token)
            .json(&json!({"user_name": "Grace Brewster Hopper", "user_email": "grace@navy.mil"}))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = created.json();
        assert_eq!(body.data["user_name"], "Grace Brewster Hopper");
        assert_eq!(body.data["status"], "UNUSED");
        assert!(body.data["scanned_at"].is_null());

        let participants =
            authed(server.get(&format!("/events/{}/participants", event_id)), &token).await;
        let body: ApiResponse<Vec<Value>> = participants.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["first_name"], "Grace");
        assert_eq!(body.data[0]["last_name"], "Brewster Hopper");
        assert_eq!(body.data[0]["email"], "grace@navy.mil");
    }

    #[tokio::test]
    async fn test_bulk_tickets_are_all_or_nothing() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;
        let event_id = create_event(&server, &token, "Gala").await;

        let created = authed(server.post(&format!("/events/{}/tickets/bulk", event_id)), &token)
            .json(&json!({"tickets": [
                {"user_name": "Ada Lovelace"},
                {"user_name": "Alan Turing", "user_email": "alan@example.com"},
                {"user_name": "Grace Hopper"}
            ]}))
            .await;
        created.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Vec<Value>> = created.json();
        assert_eq!(body.data.len(), 3);
        let mut tokens: Vec<&str> = body
            .data
            .iter()
            .map(|t| t["qr_code_token"].as_str().unwrap())
            .collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), 3);

        let rejected = authed(server.post(&format!("/events/{}/tickets/bulk", event_id)), &token)
            .json(&json!({"tickets": [
                {"user_name": "Valid Person"},
                {"user_name": "Bad Email", "user_email": "nope"}
            ]}))
            .await;
        rejected.assert_status(StatusCode::BAD_REQUEST);

        let missing_event = authed(server.post("/events/9999/tickets/bulk"), &token)
            .json(&json!({"tickets": [{"user_name": "Ada Lovelace"}]}))
            .await;
        missing_event.assert_status(StatusCode::NOT_FOUND);

        assert_eq!(ticket::Entity::find().count(&state.db).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_scan_first_valid_then_already_scanned() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;
        let event_id = create_event(&server, &token, "Gala").await;
        let participant = create_participant(&server, &token, event_id, "Ada", "Lovelace").await;
        let qr = participant["qr_code_token"].as_str().unwrap();

        let first = scan(&server, &token, qr).await;
        assert_eq!(first["valid"], true);
        assert!(first.get("reason").is_none());
        assert_eq!(first["event_id"], event_id);
        assert_eq!(first["event_name"], "Gala");
        assert_eq!(first["user_name"], "Ada Lovelace");
        assert_eq!(first["status"], "SCANNED");
        assert!(first["scanned_at"].is_string());

        let second = scan(&server, &token, qr).await;
        assert_eq!(second["valid"], false);
        assert_eq!(second["reason"], "already_scanned");
        assert_eq!(second["status"], "SCANNED");
        assert_eq!(second["scanned_at"], first["scanned_at"]);

        let listed = authed(server.get(&format!("/events/{}/participants", event_id)), &token)
            .await
            .json::<ApiResponse<Vec<Value>>>();
        assert_eq!(listed.data[0]["status"], "SCANNED");
        assert_eq!(listed.data[0]["scanned_at"], first["scanned_at"]);

        let unknown = scan(&server, &token, "does-not-exist").await;
        assert_eq!(unknown["valid"], false);
        assert_eq!(unknown["reason"], "ticket_not_found");
        assert!(unknown["ticket_id"].is_null());
    }

    #[tokio::test]
    async fn test_deleting_event_removes_participants() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;
        let gala = create_event(&server, &token, "Gala").await;
        let kept = create_event(&server, &token, "Kept").await;
        let participant = create_participant(&server, &token, gala, "Ada", "Lovelace").await;
        create_participant(&server, &token, kept, "Alan", "Turing").await;

        authed(server.delete(&format!("/events/{}", gala)), &token)
            .await
            .assert_status(StatusCode::OK);

        assert_eq!(ticket::Entity::find().count(&state.db).await.unwrap(), 1);
        authed(server.get(&format!("/events/{}/participants", gala)), &token)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let qr = participant["qr_code_token"].as_str().unwrap();
        let result = scan(&server, &token, qr).await;
        assert_eq!(result["reason"], "ticket_not_found");
    }

    #[tokio::test]
    async fn test_students_create_and_classify() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;

        let internal = authed(server.post("/students"), &token)
            .json(&json!({"first_name": "Ada", "last_name": "Lovelace", "email": "Ada@school.edu"}))
            .await;
        internal.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = internal.json();
        assert_eq!(body.data["is_external"], false);
        assert_eq!(body.data["email"], "ada@school.edu");

        let outside = authed(server.post("/students"), &token)
            .json(&json!({"first_name": "Alan", "last_name": "Turing", "email": "alan@gmail.com"}))
            .await;
        let body: ApiResponse<Value> = outside.json();
        assert_eq!(body.data["is_external"], true);

        let guest = authed(server.post("/students/external"), &token)
            .json(&json!({"first_name": "Grace", "last_name": "Hopper", "email": "grace@school.edu"}))
            .await;
        guest.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = guest.json();
        assert_eq!(body.data["is_external"], true);

        let duplicate = authed(server.post("/students"), &token)
            .json(&json!({"first_name": "Ada", "last_name": "L", "email": "ada@school.edu"}))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);

        let listed = authed(server.get("/students"), &token).await;
        let body: ApiResponse<Vec<Value>> = listed.json();
        let last_names: Vec<&str> = body
            .data
            .iter()
            .map(|s| s["last_name"].as_str().unwrap())
            .collect();
        assert_eq!(last_names, vec!["Hopper", "Lovelace", "Turing"]);
    }

    #[tokio::test]
    async fn test_student_search() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;

        let mut csv = String::from("first_name;last_name;email\n");
        for i in 0..30 {
            csv.push_str(&format!("Student;Dupont{:02};dupont{}@school.edu\n", i, i));
        }
        csv.push_str("Marie;Curie;marie.curie@school.edu\n");
        let form = MultipartForm::new().add_text("file", csv);
        authed(server.post("/students/import-csv"), &token)
            .multipart(form)
            .await
            .assert_status(StatusCode::OK);

        let capped = authed(server.get("/students/search").add_query_param("q", "DUPONT"), &token).await;
        capped.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = capped.json();
        assert_eq!(body.data.len(), 20);
        assert_eq!(body.data[0]["last_name"], "Dupont00");

        let by_email = authed(server.get("/students/search").add_query_param("q", "curie@"), &token).await;
        let body: ApiResponse<Vec<Value>> = by_email.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["first_name"], "Marie");

        let none = authed(server.get("/students/search").add_query_param("q", "zzz"), &token).await;
        let body: ApiResponse<Vec<Value>> = none.json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_import_csv_skips_duplicates() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;

        authed(server.post("/students"), &token)
            .json(&json!({"first_name": "Ada", "last_name": "Lovelace", "email": "ada@school.edu"}))
            .await
            .assert_status(StatusCode::CREATED);

        let csv = "first_name;last_name;email\n\
                   Ada;Lovelace;ADA@school.edu\n\
                   Alan;Turing;alan@gmail.com\n\
                   Grace;Hopper;grace@school.edu\n\
                   Marie;Curie;marie@lab.school.edu\n";
        let response = authed(server.post("/students/import-csv"), &token)
            .multipart(MultipartForm::new().add_text("file", csv))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["inserted"], 3);
        assert_eq!(body.data["skipped_duplicates"], 1);

        let students = student::Entity::find().all(&state.db).await.unwrap();
        assert_eq!(students.len(), 4);
        let turing = students.iter().find(|s| s.last_name == "Turing").unwrap();
        assert!(turing.is_external);
        let curie = students.iter().find(|s| s.last_name == "Curie").unwrap();
        assert!(!curie.is_external);
    }

    #[tokio::test]
    async fn test_import_csv_rejects_missing_column() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;

        let csv = "first_name;last_name\nAda;Lovelace\nAlan;Turing\n";
        let response = authed(server.post("/students/import-csv"), &token)
            .multipart(MultipartForm::new().add_text("file", csv))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert_eq!(error["code"], "VALIDATION_ERROR");

        let no_file = authed(server.post("/students/import-csv"), &token)
            .multipart(MultipartForm::new().add_text("other", "x"))
            .await;
        no_file.assert_status(StatusCode::BAD_REQUEST);

        assert_eq!(student::Entity::find().count(&state.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_prometheus_metrics_endpoint() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // The metrics layer is not installed in test builds
        let response = server.get("/metrics").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_not_found_error_body() {
        let (server, state) = setup_test_server().await;
        let (_, token) = seed_user(&state, "owner@example.com", false).await;

        let response = authed(server.get("/events/424242/participants"), &token).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let error: Value = response.json();
        assert_eq!(error["code"], "NOT_FOUND");
        assert_eq!(error["error"], "Event 424242 not found");
        assert_eq!(error["success"], false);
    }
}
