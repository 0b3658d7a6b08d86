//! Sheet Flow Demo
//!
//! A mail client flow driven headlessly: an inbox, a pushed message, a
//! compose sheet with its own router, and a send confirmation that closes
//! the whole flow from inside the sheet.
//!
//! Run with `RUST_LOG=debug cargo run --example sheet_flow` to see the
//! router's decisions.

use route_stack::{
    route_fn, view_fn, Content, ReplaceParentPresenter, Route, Router, RouterLink,
    SiblingPresenter, StackSurface,
};

/// Compose screen for a reply to `subject`.
struct Compose;

impl Route<String> for Compose {
    type Dependency = String;

    fn render(&self, subject: &String) -> Content<String> {
        Content::view(format!("compose: Re: {subject}"))
    }

    fn name(&self) -> &'static str {
        "Compose"
    }
}

fn show(step: &str, surface: &StackSurface<String>) {
    println!("{step:<28} {:?}", surface.visible_top());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let surface = StackSurface::new();
    let router = Router::builder(surface.clone()).label("mail").build();

    let inbox = router.replace_root_with(view_fn(|| Content::view("inbox".to_string())))?;
    show("inbox", &surface);

    let message = router.navigate(
        route_fn(|subject: &String| Content::view(format!("message: {subject}"))),
        "Lunch?".to_string(),
        &ReplaceParentPresenter,
        Some(inbox),
    )?;
    show("message over inbox", &surface);
    router.dismiss_up_to_including(message);

    let reply = RouterLink::new(Compose, "Lunch?".to_string()).presenter(SiblingPresenter::default());
    let scope = surface
        .top_content()
        .and_then(|content| content.scope().cloned())
        .ok_or("inbox has no route scope")?;
    let sheet = reply.activate(&scope)?;
    show("compose sheet", &surface);

    let sheet_surface = surface
        .children()
        .pop()
        .ok_or("sheet did not spawn a child router")?;
    let sheet_router = sheet_surface
        .top_content()
        .and_then(|content| content.scope().and_then(|scope| scope.router()))
        .ok_or("sheet router is gone")?;

    sheet_router.push(view_fn(|| Content::view("sent!".to_string())))?;
    println!("{:<28} {:?}", "  inside sheet", sheet_surface.visible_top());

    // Closing the flow from inside the sheet hands the dismissal to the mail router.
    let result = sheet_router.dismiss_up_to(inbox);
    println!("{:<28} {:?}", "dismiss to inbox", result);
    show("back at inbox", &surface);

    assert!(!router.is_presenting(sheet));
    assert_eq!(router.stack_ids(), vec![inbox]);
    Ok(())
}
