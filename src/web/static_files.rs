use std::path::{Path, PathBuf};

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::HttpResponse;
use log::{debug, error};

use crate::config::ENTRY_DOCUMENT;

/// Serves the front-end bundle at `/`. GET/HEAD requests without a matching file
/// get the entry document so client-side routing can take over.
pub fn service(static_dir: &Path) -> Files {
    let entry = static_dir.join(ENTRY_DOCUMENT);

    Files::new("/", static_dir)
        .index_file(ENTRY_DOCUMENT)
        .default_handler(fn_service(move |req: ServiceRequest| {
            let entry = entry.clone();
            async move { spa_fallback(req, entry).await }
        }))
}

async fn spa_fallback(
    req: ServiceRequest,
    entry: PathBuf,
) -> Result<ServiceResponse, actix_web::Error> {
    // `Files` answers anything but GET/HEAD with 405 before reaching this point
    let (req, _) = req.into_parts();

    debug!("No static file for {}, serving {}", req.path(), entry.display());

    let res = match NamedFile::open_async(&entry).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            error!("Entry document {} unavailable: {}", entry.display(), e);
            HttpResponse::NotFound().finish()
        }
    };
    Ok(ServiceResponse::new(req, res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::routes;
    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, App};
    use std::fs;
    use tempfile::TempDir;

    const INDEX: &str = "<!doctype html><title>chat</title>";

    fn bundle() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), INDEX).unwrap();
        fs::write(dir.path().join("app.js"), "console.log('chat');").unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets").join("style.css"), "body {}").unwrap();
        dir
    }

    async fn get(dir: &TempDir, uri: &str) -> (StatusCode, String) {
        let app = test::init_service(
            App::new()
                .configure(routes::configure)
                .service(service(dir.path())),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn serves_existing_files() {
        let dir = bundle();

        assert_eq!(
            get(&dir, "/app.js").await,
            (StatusCode::OK, "console.log('chat');".to_string())
        );
        assert_eq!(
            get(&dir, "/assets/style.css").await,
            (StatusCode::OK, "body {}".to_string())
        );
    }

    #[actix_web::test]
    async fn root_serves_the_entry_document() {
        let dir = bundle();
        assert_eq!(get(&dir, "/").await, (StatusCode::OK, INDEX.to_string()));
    }

    #[actix_web::test]
    async fn unknown_client_routes_fall_back_to_the_entry_document() {
        let dir = bundle();

        for uri in ["/some/client/route", "/settings", "/assets/missing.png"] {
            assert_eq!(get(&dir, uri).await, (StatusCode::OK, INDEX.to_string()), "{}", uri);
        }
    }

    #[actix_web::test]
    async fn head_requests_fall_back_to_the_entry_document() {
        let dir = bundle();
        let app = test::init_service(App::new().service(service(dir.path()))).await;

        let req = test::TestRequest::default()
            .method(Method::HEAD)
            .uri("/settings")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(content_type.starts_with("text/html"), "{}", content_type);
    }

    #[actix_web::test]
    async fn other_methods_never_get_the_entry_document() {
        let dir = bundle();
        let app = test::init_service(App::new().service(service(dir.path()))).await;

        let req = test::TestRequest::post().uri("/settings").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = test::read_body(resp).await;
        assert!(!String::from_utf8_lossy(&body).contains("<title>chat</title>"));
    }

    #[actix_web::test]
    async fn unmatched_api_paths_are_not_found() {
        let dir = bundle();
        let (status, body) = get(&dir, "/api/unknown").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.contains("<title>chat</title>"));
    }

    #[actix_web::test]
    async fn missing_entry_document_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, _) = get(&dir, "/some/client/route").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
