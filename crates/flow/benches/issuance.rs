use std::sync::Arc;

use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use casflow_auth::{
    AccessStrategy, Authentication, Credential, Principal, RegisteredService, Service,
};
use casflow_core::TicketGrantingTicketId;
use casflow_flow::in_memory::{
    InMemoryAuthenticationSystemSupport, InMemoryServicesManager, InMemoryTicketRegistry,
    collaborators,
};
use casflow_flow::{EventResolver, RequestContext, ServiceTicketRequestResolver, SsoSettings};

const SERVICE: &str = "https://app.example.org";

fn resolver() -> ServiceTicketRequestResolver {
    let principal = Principal::new("casuser").with_attribute("memberOf", ["staff"]);

    let registry = Arc::new(InMemoryTicketRegistry::new());
    registry.add_ticket_granting_ticket(
        TicketGrantingTicketId::new("TGT-1"),
        Authentication::new(principal.clone(), Utc::now()),
    );

    let services = Arc::new(InMemoryServicesManager::with_services([RegisteredService::new(
        1,
        "app",
        format!("{SERVICE}*"),
    )
    .with_access_strategy(AccessStrategy::default().require_attribute("memberOf", ["staff"]))]));

    let auth = Arc::new(InMemoryAuthenticationSystemSupport::new());
    auth.add_account("Mellon", principal);

    ServiceTicketRequestResolver::new(SsoSettings::default(), collaborators(registry, services, auth))
}

fn bench_resolution(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let resolver = resolver();

    c.bench_function("resolve/granted", |b| {
        b.iter(|| {
            let mut ctx = RequestContext::new()
                .with_ticket_granting_ticket("TGT-1")
                .with_service(Service::new(SERVICE))
                .with_credential(Credential::with_secret("casuser", "Mellon"));
            black_box(runtime.block_on(resolver.resolve(&mut ctx)))
        })
    });

    c.bench_function("resolve/not_applicable", |b| {
        b.iter(|| {
            let mut ctx = RequestContext::new().with_service(Service::new(SERVICE));
            black_box(runtime.block_on(resolver.resolve(&mut ctx)))
        })
    });
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);
