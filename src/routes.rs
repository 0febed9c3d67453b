use crate::{
    api::{document, profile, request},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    governor::middleware::NoOpMiddleware, Governor, GovernorConfig, GovernorConfigBuilder,
    PeerIpKeyExtractor,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    // Governor is cheap to clone (shared state behind an Arc)
    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let refresh_limiter = build_limiter(config.rate_refresh_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(Governor::new(&register_limiter))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(Governor::new(&refresh_limiter))
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&protected_limiter)) // rate limiting
            .service(
                web::scope("/requests")
                    // /requests
                    .service(
                        web::resource("")
                            .route(web::get().to(request::request_list))
                            .route(web::post().to(request::create_request)),
                    )
                    // /requests/{id}
                    .service(
                        web::resource("/{id}").route(web::get().to(request::get_request)),
                    )
                    // /requests/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(request::approve_request)),
                    )
                    // /requests/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(request::reject_request)),
                    ),
            )
            .service(
                web::scope("/profile")
                    // /profile
                    .service(web::resource("").route(web::get().to(profile::get_profile)))
                    // /profile/employee-id
                    .service(
                        web::resource("/employee-id")
                            .route(web::put().to(profile::update_employee_id)),
                    ),
            )
            .service(
                web::scope("/documents")
                    // /documents
                    .service(web::resource("").route(web::post().to(document::upload_document)))
                    // /documents/{name}
                    .service(
                        web::resource("/{name}")
                            .route(web::get().to(document::download_document)),
                    ),
            ),
    );
}
