use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ChartPoint {
    day: String,
    stress_level: u8,
}

#[derive(Debug, Deserialize)]
struct DiaryView {
    session_id: String,
    chart: Vec<ChartPoint>,
    poor_condition_days: Vec<String>,
    poor_condition_label: String,
    export_file_name: String,
    exports: u32,
    last_exported_at: Option<String>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_health_diary"))
        .env("HOST", "127.0.0.1")
        .env("PORT", port.to_string())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn new_session(client: &Client, base_url: &str) -> DiaryView {
    let response = client
        .post(format!("{base_url}/api/sessions"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

async fn put(client: &Client, url: String, body: serde_json::Value) -> DiaryView {
    let response = client.put(url).json(&body).send().await.unwrap();
    assert!(response.status().is_success(), "{}", response.status());
    response.json().await.unwrap()
}

async fn post_text(client: &Client, url: String) -> String {
    let response = client.post(url).send().await.unwrap();
    assert!(response.status().is_success(), "{}", response.status());
    response.text().await.unwrap()
}

#[tokio::test]
async fn http_index_serves_the_form() {
    let server = shared_server().await;
    let html = Client::new()
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Challenge Health Diary"));
    assert!(html.contains("data-day=\"Sun\""));
}

#[tokio::test]
async fn http_default_week_exports_named_file() {
    let server = shared_server().await;
    let client = Client::new();
    let view = new_session(&client, &server.base_url).await;
    let session_url = format!("{}/api/sessions/{}", server.base_url, view.session_id);

    let view = put(
        &client,
        format!("{session_url}/profile"),
        serde_json::json!({ "owner_name": "Kim", "week_number": 3 }),
    )
    .await;
    assert_eq!(view.export_file_name, "Kim_week_3_health_diary.csv");
    assert_eq!(view.poor_condition_label, "none");

    let response = client
        .post(format!("{session_url}/export"))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.contains("filename=\"Kim_week_3_health_diary.csv\""));
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));

    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        "Mon,Tue,Wed,Thu,Fri,Sat,Sun,Mon,Tue,Wed,Thu,Fri,Sat,Sun,health_notes,goals\n\
         ,,,,,,,0.0,0.0,0.0,0.0,0.0,0.0,0.0,,\n"
    );
}

#[tokio::test]
async fn http_day_edits_drive_chart_and_condition_check() {
    let server = shared_server().await;
    let client = Client::new();
    let view = new_session(&client, &server.base_url).await;
    let session_url = format!("{}/api/sessions/{}", server.base_url, view.session_id);

    put(
        &client,
        format!("{session_url}/days/sun"),
        serde_json::json!({ "sleep_hours": 5, "stress_level": 9 }),
    )
    .await;
    put(
        &client,
        format!("{session_url}/days/Wed"),
        serde_json::json!({ "sleep_hours": 7, "stress_level": 8 }),
    )
    .await;
    let view = put(
        &client,
        format!("{session_url}/days/Tue"),
        serde_json::json!({ "sleep_hours": 6, "stress_level": 6 }),
    )
    .await;

    let days: Vec<&str> = view.chart.iter().map(|point| point.day.as_str()).collect();
    assert_eq!(days, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    assert_eq!(view.chart[6].stress_level, 9);
    assert_eq!(view.poor_condition_days, ["Tue", "Sun"]);
    assert_eq!(view.poor_condition_label, "Tue, Sun");
}

#[tokio::test]
async fn http_export_is_repeatable_and_keeps_values() {
    let server = shared_server().await;
    let client = Client::new();
    let view = new_session(&client, &server.base_url).await;
    let session_url = format!("{}/api/sessions/{}", server.base_url, view.session_id);

    put(
        &client,
        format!("{session_url}/days/Fri"),
        serde_json::json!({ "meal_text": "salad, \"no\" dressing", "water_liters": 2.3 }),
    )
    .await;
    put(
        &client,
        format!("{session_url}/notes"),
        serde_json::json!({ "health_notes": "tired", "goals": "bed by 11" }),
    )
    .await;

    let first = post_text(&client, format!("{session_url}/export")).await;
    let second = post_text(&client, format!("{session_url}/export")).await;
    assert_eq!(first, second);

    let row = first.lines().nth(1).unwrap();
    assert_eq!(
        row,
        ",,,,\"salad, \"\"no\"\" dressing\",,,0.0,0.0,0.0,0.0,2.3,0.0,0.0,tired,bed by 11"
    );

    let vitals = post_text(&client, format!("{session_url}/export?vitals=true")).await;
    let header = vitals.lines().next().unwrap();
    assert_eq!(header.split(',').count(), 30);

    let view: DiaryView = client
        .get(&session_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.exports, 3);
    assert!(view.last_exported_at.is_some());
}

#[tokio::test]
async fn http_rejects_unknown_session_and_day() {
    let server = shared_server().await;
    let client = Client::new();

    let missing = client
        .get(format!(
            "{}/api/sessions/00000000-0000-0000-0000-000000000000",
            server.base_url
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let view = new_session(&client, &server.base_url).await;
    let response = client
        .put(format!(
            "{}/api/sessions/{}/days/Someday",
            server.base_url, view.session_id
        ))
        .json(&serde_json::json!({ "sleep_hours": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_bad_json_bodies_are_bad_requests() {
    let server = shared_server().await;
    let client = Client::new();
    let view = new_session(&client, &server.base_url).await;
    let session_url = format!("{}/api/sessions/{}", server.base_url, view.session_id);

    let mismatched = client
        .put(format!("{session_url}/profile"))
        .json(&serde_json::json!({ "week_number": 3.5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(mismatched.status(), StatusCode::BAD_REQUEST);

    let malformed = client
        .put(format!("{session_url}/days/Mon"))
        .header("content-type", "application/json")
        .body("{\"meal_text\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_export_is_not_reachable_by_get() {
    let server = shared_server().await;
    let client = Client::new();
    let view = new_session(&client, &server.base_url).await;
    let session_url = format!("{}/api/sessions/{}", server.base_url, view.session_id);

    let response = client
        .get(format!("{session_url}/export"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let view: DiaryView = client
        .get(&session_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.exports, 0);
    assert_eq!(view.last_exported_at, None);
}
