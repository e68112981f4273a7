//! Navigation scenarios against the simulated app.
//!
//! The bottom navigation bar is reachable from every screen; each scenario
//! starts from the default home screen of a fresh session.

use tantear::{
    init_test_tracing, HomeScreen, LoginScreen, ScreenContext, ScreenKind, Session, SimDriver,
    UiDriver, WaitOptions, Waiter,
};

fn ctx(driver: &dyn UiDriver) -> ScreenContext<'_> {
    ScreenContext::with_waiter(
        driver,
        Waiter::with_options(WaitOptions::new().with_timeout(2_000).with_poll_interval(10)),
    )
    .with_soft_timeout(400)
}

fn launch() -> Session<SimDriver> {
    init_test_tracing();
    Session::new(SimDriver::launch())
}

// ============================================================================
// Single-hop navigation
// ============================================================================

#[test]
fn test_navigate_to_login_screen() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));
    let login = LoginScreen::from_context(ctx(session.driver()));

    home.open_login().unwrap();

    assert!(login.is_displayed());
    assert!(login.context().is_displayed(&LoginScreen::EMAIL_INPUT));
    assert!(login.context().is_displayed(&LoginScreen::PASSWORD_INPUT));
}

#[test]
fn test_navigate_to_forms_screen() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    home.open_forms().unwrap();

    assert!(home.is_forms_screen_displayed());
    assert!(home.context().is_displayed(&HomeScreen::FORMS_INPUT));
}

#[test]
fn test_navigate_to_webview_screen() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    home.open_webview().unwrap();

    assert!(home.is_webview_screen_displayed());
}

#[test]
fn test_navigate_back_to_home() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    home.open_login().unwrap();
    home.open_home().unwrap();

    assert!(home.is_home_screen_displayed());
}

#[test]
fn test_device_back_returns_home() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    home.open_forms().unwrap();
    home.context().back().unwrap();

    assert!(home.is_home_screen_displayed());
}

// ============================================================================
// Navigation bar invariants
// ============================================================================

#[test]
fn test_navigation_bar_always_visible() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    assert!(home.is_nav_bar_visible(), "nav bar on home screen");

    home.open_login().unwrap();
    assert!(home.is_nav_bar_visible(), "nav bar on login screen");

    home.open_forms().unwrap();
    assert!(home.is_nav_bar_visible(), "nav bar on forms screen");
}

#[test]
fn test_sequential_navigation() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));
    let login = LoginScreen::from_context(ctx(session.driver()));

    home.open_login().unwrap();
    assert!(login.is_displayed());

    home.open_forms().unwrap();
    assert!(home.is_forms_screen_displayed());

    home.open_webview().unwrap();
    assert!(home.is_webview_screen_displayed());

    home.open_home().unwrap();
    assert!(home.is_home_screen_displayed());
}

// ============================================================================
// Screen inference
// ============================================================================

#[test]
fn test_current_screen_follows_navigation() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    assert_eq!(home.current_screen_within(200), ScreenKind::Home);

    home.open_forms().unwrap();
    assert_eq!(home.current_screen_within(200), ScreenKind::Forms);

    home.open_webview().unwrap();
    assert_eq!(home.current_screen_within(200), ScreenKind::Webview);

    home.open_drag().unwrap();
    assert_eq!(home.current_screen_within(200), ScreenKind::Unknown);
}

// ============================================================================
// Forms interaction
// ============================================================================

#[test]
fn test_forms_input_interaction() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    home.open_forms().unwrap();
    home.enter_forms_text("Test Input").unwrap();

    assert!(home.is_forms_screen_displayed());
    assert_eq!(home.forms_input_text().unwrap(), "Test Input");
}

#[test]
fn test_forms_switch_toggle() {
    let session = launch();
    let home = HomeScreen::from_context(ctx(session.driver()));

    home.open_forms().unwrap();
    assert!(!home.is_switch_checked().unwrap());

    home.toggle_switch().unwrap();
    assert!(home.is_switch_checked().unwrap());

    home.toggle_switch().unwrap();
    assert!(!home.is_switch_checked().unwrap());
}
