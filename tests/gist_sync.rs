use chrono::NaiveDate;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use workout_tracker::gist::GistClient;
use workout_tracker::models::Program;
use workout_tracker::store::encode;
use workout_tracker::{
    Config, DualStore, RecordStore, RemoteConfig, RemoteError, SyncWarning, WorkoutRecord,
};

const HEADER: &str = "Дата,Тренировка,Упражнение,Подход,Повторения,Вес\n";

fn remote(server: &MockServer) -> RemoteConfig {
    RemoteConfig {
        api_url: server.uri(),
        gist_id: "abc123".to_string(),
        token: "secret".to_string(),
    }
}

fn bench(date: &str, weight: f64) -> WorkoutRecord {
    let date: NaiveDate = date.parse().unwrap();
    WorkoutRecord::new(date, Program::A, "Жим лежа", 1, 10, weight)
}

fn gist_body(content: &str) -> serde_json::Value {
    json!({
        "id": "abc123",
        "files": {
            "workout_data.csv": { "filename": "workout_data.csv", "content": content }
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_returns_data_slot() {
    let server = MockServer::start().await;
    let content = format!("{HEADER}2024-01-01,Тренировка A,Жим лежа,1,10,20.0\n");

    Mock::given(method("GET"))
        .and(path("/gists/abc123"))
        .and(header("Authorization", "token secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gist_body(&content)))
        .expect(1)
        .mount(&server)
        .await;

    let config = remote(&server);
    let fetched = tokio::task::spawn_blocking(move || GistClient::new(&config).unwrap().fetch())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, Some(content));
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_without_slot_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gists/abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"files": {"notes.md": {"content": "x"}}})),
        )
        .mount(&server)
        .await;

    let config = remote(&server);
    let fetched = tokio::task::spawn_blocking(move || GistClient::new(&config).unwrap().fetch())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_ok_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let config = remote(&server);
    let (fetched, pushed) = tokio::task::spawn_blocking(move || {
        let client = GistClient::new(&config).unwrap();
        (client.fetch(), client.push(HEADER))
    })
    .await
    .unwrap();
    assert!(matches!(fetched, Err(RemoteError::Status(s)) if s.as_u16() == 404));
    assert!(matches!(pushed, Err(RemoteError::Status(s)) if s.as_u16() == 401));
}

#[tokio::test(flavor = "multi_thread")]
async fn load_prefers_remote_and_refreshes_backup() {
    let server = MockServer::start().await;
    let remote_records = vec![bench("2024-01-08", 22.5)];
    let content = encode(&remote_records).unwrap();
    Mock::given(method("GET"))
        .and(path("/gists/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gist_body(&content)))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("workout_data.csv");
    std::fs::write(&data_file, encode(&[bench("2024-01-01", 20.0)]).unwrap()).unwrap();

    let config = Config {
        data_file: data_file.clone(),
        remote: Some(remote(&server)),
    };
    let loaded = tokio::task::spawn_blocking(move || DualStore::new(&config).unwrap().load())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.value, remote_records);
    assert!(loaded.warnings.is_empty());
    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), content);
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_remote_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gist_body("Дата\nnot-a-date\n")))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("workout_data.csv");
    let local = vec![bench("2024-01-01", 20.0)];
    std::fs::write(&data_file, encode(&local).unwrap()).unwrap();

    let config = Config {
        data_file,
        remote: Some(remote(&server)),
    };
    let loaded = tokio::task::spawn_blocking(move || DualStore::new(&config).unwrap().load())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.value, local);
    assert!(matches!(loaded.warnings.as_slice(), [SyncWarning::Malformed(_)]));
}

#[tokio::test(flavor = "multi_thread")]
async fn append_writes_both_targets() {
    let server = MockServer::start().await;
    let existing = vec![bench("2024-01-01", 20.0)];
    Mock::given(method("GET"))
        .and(path("/gists/abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(gist_body(&encode(&existing).unwrap())),
        )
        .mount(&server)
        .await;

    let mut expected = existing.clone();
    expected.push(bench("2024-01-08", 22.5));
    let expected_text = encode(&expected).unwrap();
    Mock::given(method("PATCH"))
        .and(path("/gists/abc123"))
        .and(header("Authorization", "token secret"))
        .and(body_json(json!({"files": {"workout_data.csv": {"content": expected_text.as_str()}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(gist_body(&expected_text)))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("workout_data.csv");
    let config = Config {
        data_file: data_file.clone(),
        remote: Some(remote(&server)),
    };
    let appended = tokio::task::spawn_blocking(move || {
        DualStore::new(&config).unwrap().append(bench("2024-01-08", 22.5))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(appended.value, expected);
    assert!(appended.warnings.is_empty());
    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), expected_text);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_push_still_saves_locally() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("workout_data.csv");
    let records = vec![bench("2024-01-01", 20.0)];
    let config = Config {
        data_file: data_file.clone(),
        remote: Some(remote(&server)),
    };
    let to_save = records.clone();
    let warnings =
        tokio::task::spawn_blocking(move || DualStore::new(&config).unwrap().persist(&to_save))
            .await
            .unwrap()
            .unwrap();

    assert!(matches!(
        warnings.as_slice(),
        [SyncWarning::Push(RemoteError::Status(_))]
    ));
    let saved = std::fs::read_to_string(&data_file).unwrap();
    assert_eq!(saved, encode(&records).unwrap());
}
