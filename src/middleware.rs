//! HTTP middleware for the HTML-facing part of the application.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, HttpResponse};

/// Default location of the external sign-in page users are bounced to.
pub const SIGNIN_LOCATION: &str = "/auth/signin";

/// Turns 401/403 responses into a redirect to the sign-in page.
///
/// JSON endpoints under `/api` are mounted outside this middleware and keep
/// their bare status codes.
#[derive(Clone)]
pub struct RedirectUnauthorized {
    location: String,
}

impl RedirectUnauthorized {
    /// Redirects to the given sign-in location instead of the default.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

impl Default for RedirectUnauthorized {
    fn default() -> Self {
        Self::new(SIGNIN_LOCATION)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware {
            service: Rc::new(service),
            location: Rc::new(self.location.clone()),
        }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: Rc<S>,
    location: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let location = Rc::clone(&self.location);

        Box::pin(async move {
            // Kept so extractor failures (Err path) can still be answered.
            let request = req.request().clone();

            let signin_redirect = || {
                HttpResponse::SeeOther()
                    .insert_header((header::LOCATION, location.as_str()))
                    .finish()
            };

            match service.call(req).await {
                Ok(res)
                    if matches!(
                        res.status(),
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                    ) =>
                {
                    let (request, _) = res.into_parts();
                    Ok(ServiceResponse::new(request, signin_redirect()).map_into_right_body())
                }
                Ok(res) => Ok(res.map_into_left_body()),
                Err(err)
                    if matches!(
                        err.as_response_error().status_code(),
                        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                    ) =>
                {
                    Ok(ServiceResponse::new(request, signin_redirect()).map_into_right_body())
                }
                Err(err) => Err(err),
            }
        })
    }
}
