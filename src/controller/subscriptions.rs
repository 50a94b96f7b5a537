use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse};

use serde::{Deserialize, Serialize};

use crate::controller::CurrentCustomer;
use crate::engine::{CreateRequest, Outcome, Rejection, RejectionKind, SubscriptionEngine};
use crate::error::{RestError, RestResult};
use crate::settings::StorefrontSettings;

/// Form deserialization wrapper for parsing new subscription requests
#[derive(Debug, Deserialize)]
pub struct NewSubscriptionForm {
    email: Option<String>,
    product_variant_code: String,
    channel_code: Option<String>,
    locale_code: Option<String>,
}

impl NewSubscriptionForm {
    fn into_request(self, storefront: &StorefrontSettings) -> CreateRequest {
        CreateRequest {
            email: self.email,
            product_variant_code: self.product_variant_code,
            channel_code: self
                .channel_code
                .unwrap_or_else(|| storefront.default_channel().to_string()),
            locale_code: self
                .locale_code
                .unwrap_or_else(|| storefront.default_locale().to_string()),
        }
    }
}

/// Create endpoint for new subscriptions
#[tracing::instrument(name = "Create a new stock subscription", skip(engine, storefront))]
#[post("")]
async fn create(
    engine: web::Data<SubscriptionEngine>,
    storefront: web::Data<StorefrontSettings>,
    customer: CurrentCustomer,
    form: web::Form<NewSubscriptionForm>,
) -> RestResult<HttpResponse> {
    let request = form.into_inner().into_request(storefront.get_ref());

    let outcome = engine.create(request, customer.0.as_ref()).await?;

    Ok(match outcome {
        Outcome::Success(subscription) => HttpResponse::Created().json(subscription),
        Outcome::Rejected(rejection) => rejection_response(rejection),
        Outcome::Informational(message) => HttpResponse::Ok().json(InfoBody { message }),
    })
}

/// Tokenized self-service deletion endpoint. A GET on purpose: the link
/// lands in an email and must be clickable.
#[tracing::instrument(name = "Delete a stock subscription by token", skip(engine, path))]
#[get("/delete/{token}")]
async fn delete(
    engine: web::Data<SubscriptionEngine>,
    path: web::Path<(String,)>,
) -> RestResult<HttpResponse> {
    let (token,) = path.into_inner();

    let outcome = engine.delete(&token).await?;

    Ok(match outcome {
        Outcome::Success(_) => HttpResponse::Ok().json(InfoBody {
            message: "subscription deleted".into(),
        }),
        Outcome::Informational(message) => HttpResponse::Ok().json(InfoBody { message }),
        Outcome::Rejected(rejection) => rejection_response(rejection),
    })
}

/// Account page listing of the customer's pending subscriptions
#[tracing::instrument(name = "List stock subscriptions for account", skip(engine))]
#[get("")]
async fn account_list(
    engine: web::Data<SubscriptionEngine>,
    customer: CurrentCustomer,
) -> RestResult<HttpResponse> {
    let customer = customer
        .0
        .ok_or_else(|| RestError::Unauthorized("Sign in to view your subscriptions".into()))?;

    let subscriptions = engine.list_for_owner(customer.id).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

#[derive(Debug, Serialize)]
struct InfoBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct RejectionBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

fn rejection_response(rejection: Rejection) -> HttpResponse {
    let status = match rejection.kind() {
        RejectionKind::Validation => StatusCode::BAD_REQUEST,
        RejectionKind::NotFound => StatusCode::NOT_FOUND,
        RejectionKind::Conflict => StatusCode::CONFLICT,
    };

    // The duplicate-subscription payload carries the email for display
    let email = match &rejection {
        Rejection::AlreadySubscribed { email } => Some(email.as_ref().to_string()),
        _ => None,
    };

    HttpResponse::build(status).json(RejectionBody {
        error: rejection.to_string(),
        email,
    })
}

/// Subscriptions API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/subscriptions").service(create).service(delete)
}

/// Account-facing endpoints, refused without an authenticated customer
pub fn account_scope() -> impl HttpServiceFactory {
    web::scope("/account/subscriptions").service(account_list)
}
