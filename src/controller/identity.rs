use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};

use uuid::Uuid;

use crate::domain::{Customer, EmailAddress};

/// Header carrying the authenticated customer ID, set by the upstream
/// storefront session layer
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";
/// Header carrying the authenticated customer's email, if any
pub const CUSTOMER_EMAIL_HEADER: &str = "x-customer-email";

/// The customer behind the current request, if the storefront
/// authenticated one. Session machinery itself lives upstream; this layer
/// only trusts the identity headers it forwards.
#[derive(Debug)]
pub struct CurrentCustomer(pub Option<Customer>);

impl FromRequest for CurrentCustomer {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(customer_from_headers(req.headers()))))
    }
}

fn customer_from_headers(headers: &HeaderMap) -> Option<Customer> {
    let id = headers
        .get(CUSTOMER_ID_HEADER)?
        .to_str()
        .ok()?
        .parse::<Uuid>()
        .ok()?;

    let email = headers
        .get(CUSTOMER_EMAIL_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<EmailAddress>().ok());

    Some(Customer { id, email })
}
