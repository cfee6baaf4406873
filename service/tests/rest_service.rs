use service::{
    EnvironmentForm, EnvironmentService, ListQuery, RestEnvironmentService, ServiceConfig,
    ServiceError,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const TIMEOUT: Duration = Duration::from_secs(10);

/// Accepts one connection, answers with `status` and `body`, and hands back
/// the raw request text.
async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&request).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if request.len() >= header_end + 4 + content_length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {} OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).to_string()
    });

    (format!("http://{}/dolphinscheduler", addr), handle)
}

fn make_service(base_url: String) -> RestEnvironmentService {
    RestEnvironmentService::new(
        ServiceConfig::default()
            .with_base_url(base_url)
            .with_token("test-token")
            .with_timeout(TIMEOUT),
    )
    .expect("service creation")
}

#[tokio::test]
async fn test_list_paging_request_and_decode() {
    let (url, server) = serve_once(
        200,
        r#"{"code":0,"msg":"success","data":{"totalList":[{"id":1,"code":101,"name":"jdk8","config":"export JAVA_HOME=/opt/jdk8","description":"java","workerGroups":["default"],"operator":1,"createTime":"2022-03-08T14:05:33.000+0800","updateTime":"2022-03-08T14:05:33.000+0800"}],"total":11,"totalPage":2,"pageSize":10,"currentPage":2,"pageNo":2}}"#,
    )
    .await;

    let service = make_service(url);
    let page = service
        .query_environment_list_paging(ListQuery::new(2, 10).with_search(Some("jdk".into())))
        .await
        .expect("list-paging failed");

    assert_eq!(page.total_page, 2);
    assert_eq!(page.total_list.len(), 1);
    assert_eq!(page.total_list[0].code, 101);
    assert_eq!(page.total_list[0].worker_groups, vec!["default"]);

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert_eq!(
        request_line,
        "GET /dolphinscheduler/environment/list-paging?pageNo=2&pageSize=10&searchVal=jdk HTTP/1.1"
    );
    assert!(request.to_ascii_lowercase().contains("token: test-token"));
    assert!(request.to_ascii_lowercase().contains("language: en_us"));
}

#[tokio::test]
async fn test_delete_posts_form() {
    let (url, server) = serve_once(200, r#"{"code":0,"msg":"success","data":null}"#).await;

    let service = make_service(url);
    service
        .delete_environment_by_code(101)
        .await
        .expect("delete failed");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /dolphinscheduler/environment/delete HTTP/1.1"));
    assert!(request
        .to_ascii_lowercase()
        .contains("content-type: application/x-www-form-urlencoded"));
    assert!(request.ends_with("environmentCode=101"));
}

#[tokio::test]
async fn test_update_posts_code_first() {
    let (url, server) = serve_once(200, r#"{"code":0,"msg":"success","data":null}"#).await;

    let service = make_service(url);
    let form = EnvironmentForm::new("jdk8", "export JAVA_HOME=/opt/jdk8")
        .with_description("java")
        .with_worker_groups(vec!["default".to_string()]);
    service
        .update_environment(101, &form)
        .await
        .expect("update failed");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /dolphinscheduler/environment/update HTTP/1.1"));
    let body = request.split("\r\n\r\n").nth(1).unwrap();
    assert!(body.starts_with("code=101&name=jdk8&"));
    assert!(body.contains("description=java"));
    assert!(body.contains("workerGroups=%5B%22default%22%5D"));
}

#[tokio::test]
async fn test_query_by_code_request_and_decode() {
    let (url, server) = serve_once(
        200,
        r#"{"code":0,"msg":"success","data":{"id":3,"code":101,"name":"jdk8","config":"export JAVA_HOME=/opt/jdk8","description":null,"workerGroups":["default","gpu"],"operator":1,"createTime":"2022-03-08T14:05:33.000+0800","updateTime":"2022-03-09T09:00:00.000+0800"}}"#,
    )
    .await;

    let service = make_service(url);
    let item = service
        .query_environment_by_code(101)
        .await
        .expect("query-by-code failed");

    assert_eq!(item.code, 101);
    assert_eq!(item.name, "jdk8");
    assert_eq!(item.description, "");
    assert_eq!(item.worker_groups, vec!["default", "gpu"]);

    let request = server.await.unwrap();
    assert_eq!(
        request.lines().next().unwrap(),
        "GET /dolphinscheduler/environment/query-by-code?environmentCode=101 HTTP/1.1"
    );
}

#[tokio::test]
async fn test_server_error_status_is_not_an_api_code() {
    let (url, server) = serve_once(500, "internal error").await;

    let service = make_service(url);
    let err = service.delete_environment_by_code(101).await.unwrap_err();
    assert!(matches!(err, ServiceError::Http { status: 500, .. }));
    assert_eq!(err.api_code(), None);
    server.await.unwrap();
}

#[tokio::test]
async fn test_api_error_envelope() {
    let (url, server) = serve_once(
        200,
        r#"{"code":120001,"msg":"this environment name [jdk8] already exists","data":null}"#,
    )
    .await;

    let service = make_service(url);
    let err = service.verify_environment("jdk8").await.unwrap_err();
    assert_eq!(err.api_code(), Some(120001));
    assert!(err.to_string().contains("already exists"));

    let request = server.await.unwrap();
    assert!(request.ends_with("environmentName=jdk8"));
}

#[tokio::test]
async fn test_create_encodes_worker_groups() {
    let (url, server) = serve_once(200, r#"{"code":0,"msg":"success","data":202}"#).await;

    let service = make_service(url);
    let form = EnvironmentForm::new("jdk11", "export A=1")
        .with_worker_groups(vec!["default".to_string(), "gpu".to_string()]);
    let code = service.create_environment(&form).await.expect("create failed");
    assert_eq!(code, 202);

    let request = server.await.unwrap();
    assert!(request.contains("name=jdk11"));
    assert!(request.contains("workerGroups=%5B%22default%22%2C%22gpu%22%5D"));
}

#[tokio::test]
async fn test_unauthorized_status() {
    let (url, server) = serve_once(401, r#"{"code":10004,"msg":"user not login"}"#).await;

    let service = make_service(url);
    let err = service.query_all_environment_list().await.unwrap_err();
    assert!(matches!(err, ServiceError::Authentication));
    server.await.unwrap();
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = make_service(format!("http://{}/dolphinscheduler", addr));
    let err = service.query_environment_by_code(1).await.unwrap_err();
    assert!(matches!(err, ServiceError::ServiceUnavailable { .. }));
}

#[tokio::test]
#[ignore]
async fn test_live_backend_listing() {
    let base_url = std::env::var("ENV_CONSOLE_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:12345/dolphinscheduler".to_string());
    let token = std::env::var("ENV_CONSOLE_TOKEN").expect("ENV_CONSOLE_TOKEN must be set");

    let service = RestEnvironmentService::new(
        ServiceConfig::default()
            .with_base_url(base_url)
            .with_token(token)
            .with_timeout(TIMEOUT),
    )
    .expect("service creation");

    let page = tokio::time::timeout(
        TIMEOUT,
        service.query_environment_list_paging(ListQuery::new(1, 10)),
    )
    .await
    .expect("list-paging timed out")
    .expect("list-paging failed");
    assert!(page.total_list.len() <= 10);
}
