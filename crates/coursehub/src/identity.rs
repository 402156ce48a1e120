use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName},
    Error,
};
use bson::oid::ObjectId;
use coursehub_auth::Identity;
use futures::future::{ok, LocalBoxFuture, Ready};
use log::debug;

/// Attaches an [`Identity`] to every request that carries a valid user id in
/// the configured header. Authentication itself happens upstream.
#[derive(Clone)]
pub struct RequesterIdentity {
    header: HeaderName,
}

impl RequesterIdentity {
    pub fn new(header: HeaderName) -> Self {
        RequesterIdentity { header }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequesterIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequesterIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequesterIdentityMiddleware {
            service,
            header: self.header.clone(),
        })
    }
}

pub struct RequesterIdentityMiddleware<S> {
    service: S,
    header: HeaderName,
}

impl<S, B> Service<ServiceRequest> for RequesterIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match requester_id(req.headers(), &self.header) {
            Some(user_id) => Identity::set_identity(user_id, &req),
            None if req.headers().contains_key(&self.header) => {
                debug!("ignoring malformed {} header", self.header)
            }
            None => {}
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            Ok(res)
        })
    }
}

fn requester_id(headers: &HeaderMap, header: &HeaderName) -> Option<ObjectId> {
    let value = headers.get(header)?.to_str().ok()?;
    ObjectId::parse_str(value.trim()).ok()
}
