use crate::error::AppError;
use crate::utils::JwtService;
use crate::wheel::Identity;
use actix_web::http::Method;
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

const ADMIN_PREFIX: &str = "/api/v1/admin";
const MAX_SESSION_KEY_LEN: usize = 64;

/// 当前请求的调用方 (由中间件写入请求扩展)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub identity: Option<Identity>,
    pub is_admin: bool,
}

/// 从请求扩展中获取调用方
pub fn current_caller(req: &HttpRequest) -> Caller {
    req.extensions().get::<Caller>().cloned().unwrap_or_default()
}

fn is_valid_session_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_SESSION_KEY_LEN
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// 身份解析:
/// - Bearer 令牌有效 → 登录用户; 令牌无效 → 401
/// - 否则读取匿名会话 Cookie
/// - /api/v1/admin 下要求管理员令牌
pub struct IdentityMiddleware {
    jwt_service: JwtService,
    session_cookie: Rc<str>,
}

impl IdentityMiddleware {
    pub fn new(jwt_service: JwtService, session_cookie: &str) -> Self {
        Self {
            jwt_service,
            session_cookie: Rc::from(session_cookie),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service,
            jwt_service: self.jwt_service.clone(),
            session_cookie: self.session_cookie.clone(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: S,
    jwt_service: JwtService,
    session_cookie: Rc<str>,
}

impl<S> IdentityMiddlewareService<S> {
    fn resolve(&self, req: &ServiceRequest) -> Result<Caller, AppError> {
        let bearer = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        if let Some(token) = bearer {
            let claims = self
                .jwt_service
                .verify_access_token(token)
                .map_err(|_| AppError::AuthError("Invalid access token".to_string()))?;
            return Ok(Caller {
                identity: Some(Identity::User(claims.user_id()?)),
                is_admin: claims.is_admin,
            });
        }

        let identity = req
            .cookie(&self.session_cookie)
            .map(|c| c.value().to_string())
            .filter(|v| is_valid_session_key(v))
            .map(Identity::Session);

        Ok(Caller {
            identity,
            is_admin: false,
        })
    }
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
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
        // 放行所有 CORS 预检请求
        if req.method() == Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let caller = match self.resolve(&req) {
            Ok(caller) => caller,
            Err(error) => return Box::pin(async move { Err(error.into()) }),
        };

        if req.path().starts_with(ADMIN_PREFIX) && !caller.is_admin {
            let error = match caller.identity {
                Some(Identity::User(_)) => AppError::Forbidden,
                _ => AppError::AuthError("Missing access token".to_string()),
            };
            return Box::pin(async move { Err(error.into()) });
        }

        req.extensions_mut().insert(caller);
        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_key_validation() {
        assert!(is_valid_session_key("9f0c2a7b1e4d4c3a8b6e5d4c3b2a1f0e"));
        assert!(!is_valid_session_key(""));
        assert!(!is_valid_session_key("bad key"));
        assert!(!is_valid_session_key(&"a".repeat(65)));
    }
}
