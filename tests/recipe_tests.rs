// tests/recipe_tests.rs

use recipebox::{config::Config, routes, state::AppState};
use sqlx::postgres::PgPoolOptions;

async fn spawn_app() -> String {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "recipe_test_secret".to_string(),
        jwt_expiration: 600,
        port: 0,
        rust_log: "error".to_string(),
        s3_bucket: None,
        s3_public_url: None,
    };

    let state = AppState::new(pool, config, None);
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

/// Registers a user and returns (token, user id).
async fn register(client: &reqwest::Client, address: &str, username: &str) -> (String, i64) {
    let form = reqwest::multipart::Form::new()
        .text("username", username.to_string())
        .text("email", format!("{}@example.com", username))
        .text("password", "password123")
        .text("confirmPassword", "password123");

    let body: serde_json::Value = client
        .post(format!("{}/api/register", address))
        .multipart(form)
        .send()
        .await
        .expect("Register failed")
        .json()
        .await
        .expect("Failed to parse register json");

    (
        body["token"].as_str().expect("Token not found").to_string(),
        body["user"]["id"].as_i64().expect("User id not found"),
    )
}

/// Creates a recipe and returns its id.
async fn create_recipe(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    title: &str,
) -> i64 {
    let form = reqwest::multipart::Form::new()
        .text("title", title.to_string())
        .text("description", "A family classic")
        .text("ingredients", "2 tortillas\n1 onion\ncilantro")
        .text("instructions", "Warm the tortillas.\nFill.\nServe.");

    let response = client
        .post(format!("{}/api/recipes", address))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Create recipe failed");

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    body["recipe"]["id"].as_i64().expect("Recipe id not found")
}

#[tokio::test]
async fn create_recipe_requires_the_mandatory_fields() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &address, &unique_name("cr")).await;

    // Missing instructions.
    let form = reqwest::multipart::Form::new()
        .text("title", "Tacos")
        .text("ingredients", "tortillas");

    let response = client
        .post(format!("{}/api/recipes", address))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn recipe_text_is_sanitized_on_the_way_in() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &address, &unique_name("xss")).await;

    let form = reqwest::multipart::Form::new()
        .text("title", "Tacos <script>alert(1)</script>")
        .text("ingredients", "tortillas")
        .text("instructions", "serve");

    let response = client
        .post(format!("{}/api/recipes", address))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    let title = body["recipe"]["title"].as_str().unwrap();
    assert!(!title.contains("<script>"));
    assert!(title.contains("Tacos"));
}

#[tokio::test]
async fn favorite_flags_are_independent_per_requesting_user() {
    // The end-to-end scenario: chef1 shares a recipe, chef2 favorites it,
    // and each of them keeps seeing their own flag.
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let chef1 = unique_name("chef1");
    let chef2 = unique_name("chef2");
    let (token1, user1_id) = register(&client, &address, &chef1).await;
    let (token2, _) = register(&client, &address, &chef2).await;

    let recipe_id = create_recipe(&client, &address, &token1, "Tacos").await;

    // chef2 lists recipes and sees Tacos, not yet favorited, with the
    // author's display fields attached.
    let listed: Vec<serde_json::Value> = client
        .get(format!("{}/api/recipes", address))
        .header("Authorization", format!("Bearer {}", token2))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let tacos = listed
        .iter()
        .find(|r| r["id"].as_i64() == Some(recipe_id))
        .expect("Tacos not listed");
    assert_eq!(tacos["is_favorite"], false);
    assert_eq!(tacos["author"], chef1.as_str());
    assert_eq!(tacos["user_id"].as_i64(), Some(user1_id));

    // chef2 favorites it.
    let response = client
        .post(format!("{}/api/recipes/{}/favorite", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token2))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // chef2's detail view shows the flag...
    let detail2: serde_json::Value = client
        .get(format!("{}/api/recipes/{}", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token2))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail2["is_favorite"], true);

    // ...while chef1's view of the same recipe is untouched.
    let detail1: serde_json::Value = client
        .get(format!("{}/api/recipes/{}", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token1))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail1["is_favorite"], false);

    // The dedicated check endpoint agrees with both.
    let check2: serde_json::Value = client
        .get(format!("{}/api/recipes/{}/is-favorite", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token2))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check2["isFavorite"], true);

    let check1: serde_json::Value = client
        .get(format!("{}/api/recipes/{}/is-favorite", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token1))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check1["isFavorite"], false);
}

#[tokio::test]
async fn double_favorite_keeps_exactly_one_row() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .unwrap();

    let (token, user_id) = register(&client, &address, &unique_name("dd")).await;
    let recipe_id = create_recipe(&client, &address, &token, "Mole").await;

    // First add succeeds.
    let response = client
        .post(format!("{}/api/recipes/{}/favorite", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Second add reports "already favorited".
    let response = client
        .post(format!("{}/api/recipes/{}/favorite", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Exactly one row for the pair.
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM favorites WHERE user_id = $1 AND recipe_id = $2",
    )
    .bind(user_id)
    .bind(recipe_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn removing_an_absent_favorite_reports_not_favorited() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (token, _) = register(&client, &address, &unique_name("rm")).await;
    let recipe_id = create_recipe(&client, &address, &token, "Pozole").await;

    // Never favorited: remove reports a client error and changes nothing.
    let response = client
        .delete(format!("{}/api/recipes/{}/favorite", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // Add, then remove: both succeed, and the flag goes back down.
    for (method, expected) in [("add", 200), ("remove", 200)] {
        let req = if method == "add" {
            client.post(format!("{}/api/recipes/{}/favorite", address, recipe_id))
        } else {
            client.delete(format!("{}/api/recipes/{}/favorite", address, recipe_id))
        };
        let response = req
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), expected);
    }

    let check: serde_json::Value = client
        .get(format!("{}/api/recipes/{}/is-favorite", address, recipe_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["isFavorite"], false);
}

#[tokio::test]
async fn favoriting_an_unknown_recipe_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (token, _) = register(&client, &address, &unique_name("uk")).await;

    let response = client
        .post(format!("{}/api/recipes/{}/favorite", address, i64::MAX))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(format!("{}/api/recipes/{}", address, i64::MAX))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn my_recipes_lists_only_the_owner_newest_first() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let (token_a, _) = register(&client, &address, &unique_name("own_a")).await;
    let (token_b, _) = register(&client, &address, &unique_name("own_b")).await;

    let first = create_recipe(&client, &address, &token_a, "First").await;
    let second = create_recipe(&client, &address, &token_a, "Second").await;
    create_recipe(&client, &address, &token_b, "Not mine").await;

    let mine: Vec<serde_json::Value> = client
        .get(format!("{}/api/my-recipes", address))
        .header("Authorization", format!("Bearer {}", token_a))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ids: Vec<i64> = mine.iter().filter_map(|r| r["id"].as_i64()).collect();
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));
    assert!(mine.iter().all(|r| r["title"] != "Not mine"));

    // Newest first.
    let pos_first = ids.iter().position(|&id| id == first).unwrap();
    let pos_second = ids.iter().position(|&id| id == second).unwrap();
    assert!(pos_second < pos_first);
}

#[tokio::test]
async fn favorites_listing_is_most_recently_favorited_first() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let author = unique_name("auth");
    let (author_token, _) = register(&client, &address, &author).await;
    let (reader_token, _) = register(&client, &address, &unique_name("rdr")).await;

    let older = create_recipe(&client, &address, &author_token, "Older").await;
    let newer = create_recipe(&client, &address, &author_token, "Newer").await;

    // Favorite in the opposite order of creation: Newer first, then Older.
    for id in [newer, older] {
        let response = client
            .post(format!("{}/api/recipes/{}/favorite", address, id))
            .header("Authorization", format!("Bearer {}", reader_token))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    let favorites: Vec<serde_json::Value> = client
        .get(format!("{}/api/favorites", address))
        .header("Authorization", format!("Bearer {}", reader_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ids: Vec<i64> = favorites.iter().filter_map(|r| r["id"].as_i64()).collect();
    let pos_older = ids.iter().position(|&id| id == older).unwrap();
    let pos_newer = ids.iter().position(|&id| id == newer).unwrap();
    // Older was favorited last, so it comes first.
    assert!(pos_older < pos_newer);

    // Author display fields ride along.
    let entry = favorites
        .iter()
        .find(|r| r["id"].as_i64() == Some(older))
        .unwrap();
    assert_eq!(entry["author"], author.as_str());
}

#[tokio::test]
async fn deleting_a_user_cascades_to_recipes_and_favorites() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .unwrap();

    let (author_token, author_id) = register(&client, &address, &unique_name("casc_a")).await;
    let (fan_token, _fan_id) = register(&client, &address, &unique_name("casc_f")).await;

    let recipe_id = create_recipe(&client, &address, &author_token, "Doomed").await;

    // The fan favorites the author's recipe; the author favorites it too.
    for token in [&fan_token, &author_token] {
        let response = client
            .post(format!("{}/api/recipes/{}/favorite", address, recipe_id))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    // Store-level cascade: deleting the author removes their recipes and
    // every favorite referencing those recipes or the author themselves.
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(author_id)
        .execute(&pool)
        .await
        .unwrap();

    let recipes_left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes WHERE user_id = $1")
        .bind(author_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(recipes_left, 0);

    let favorites_left: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM favorites WHERE recipe_id = $1 OR user_id = $2",
    )
    .bind(recipe_id)
    .bind(author_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(favorites_left, 0);

    // The fan's account survives; their favorites list is simply empty.
    let favorites: Vec<serde_json::Value> = client
        .get(format!("{}/api/favorites", address))
        .header("Authorization", format!("Bearer {}", fan_token))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(
        favorites
            .iter()
            .all(|r| r["id"].as_i64() != Some(recipe_id))
    );
}
