use crate::api::{credits, dispensaries, health, requests};
use crate::credits::{DeductCreditsRequest, DeductCreditsResponse};
use crate::service::CreateRequestInput;

use models_orders::{
    CustomerDetails, Order, OrderItem, OrderShipment, OrderStatus, PaymentStatus,
    StatusHistoryEntry,
};
use models_pool::{
    DeliveryAddress, DispensaryProfile, DispensaryStatus, Locker, PriceTier, ProductRequest,
    RequestNote, RequestStatus, SenderRole, ShippingMethod, ShippingMethodKind, StructuredAddress,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
        paths(
            health::health_handler,

            // pool requests
            requests::create_request::create_request_handler,
            requests::get_request::get_request_handler,
            requests::accept_request::accept_request_handler,
            requests::reject_request::reject_request_handler,
            requests::cancel_request::cancel_request_handler,
            requests::confirm_request::confirm_request_handler,
            requests::fulfil_request::fulfil_request_handler,
            requests::receive_request::receive_request_handler,
            requests::report_issue::report_issue_handler,
            requests::add_note::add_note_handler,
            requests::finalize_request::finalize_request_handler,

            // credits
            credits::deduct_credits::deduct_credits_handler,

            // dispensaries
            dispensaries::approve_dispensary::approve_dispensary_handler,
            dispensaries::set_status::set_status_handler,
        ),
        components(
            schemas(
                ProductRequest, RequestStatus, RequestNote, SenderRole, PriceTier,
                DeliveryAddress, StructuredAddress,
                DispensaryProfile, DispensaryStatus, ShippingMethod, ShippingMethodKind, Locker,
                Order, OrderItem, OrderShipment, OrderStatus, PaymentStatus,
                StatusHistoryEntry, CustomerDetails,
                CreateRequestInput,
                requests::ActionBody,
                requests::fulfil_request::FulfilRequestBody,
                requests::add_note::AddNoteBody,
                requests::finalize_request::FinalizeRequestBody,
                dispensaries::set_status::SetStatusBody,
                DeductCreditsRequest, DeductCreditsResponse,
            ),
        ),
        tags(
            (name = "product pool service", description = "Product pool request lifecycle")
        )
    )]
pub struct ApiDoc;
