use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use buscrm::middleware::RedirectUnauthorized;

#[actix_web::test]
async fn redirects_unauthorized_to_signin() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::default())
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/signin"
    );
}

#[actix_web::test]
async fn redirects_forbidden_to_signin() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::default())
            .default_service(web::to(|| async { HttpResponse::Forbidden().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn extractor_errors_also_redirect() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::default())
            .default_service(web::to(|| async {
                Err::<HttpResponse, _>(actix_web::error::ErrorUnauthorized("no token"))
            })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/signin"
    );
}

#[actix_web::test]
async fn success_response_passes_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::default())
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn redirects_to_configured_location() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized::new("https://auth.example/auth/signin"))
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "https://auth.example/auth/signin"
    );
}
