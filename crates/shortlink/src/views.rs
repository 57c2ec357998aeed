//! HTML pages.

use ironhtml::typed::{Document, Element};
use ironhtml_elements::{
    Body, Button, Code, Div, Form, Head, Html, Input, Label, Link, Main, Meta, Nav, Span,
    Strong, Title, A, H1, H2, P,
};

use shortlink_store::{GitHubUser, ShortLink};

/// Renders the shared page layout around `content`.
fn render_page(title: &str, user: Option<&GitHubUser>, content: &str) -> String {
    let title_str = format!("{title} | shortlink");

    Document::new()
        .doctype()
        .root::<Html, _>(|html_el| {
            html_el
                .attr("lang", "en")
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Meta, _>(|m| {
                            m.attr("name", "viewport")
                                .attr("content", "width=device-width, initial-scale=1.0")
                        })
                        .child::<Title, _>(|t| t.text(&title_str))
                        .child::<Link, _>(|l| {
                            l.attr("href", "/static/app.css").attr("rel", "stylesheet")
                        })
                })
                .child::<Body, _>(|body| {
                    body.child::<Nav, _>(|nav| render_nav(nav, user))
                        .child::<Main, _>(|m| m.child::<Div, _>(|d| d.raw(content)))
                })
        })
        .build()
}

fn render_nav(nav: Element<Nav>, user: Option<&GitHubUser>) -> Element<Nav> {
    let nav = nav.child::<A, _>(|a| {
        a.attr("href", "/")
            .child::<Strong, _>(|s| s.text("shortlink"))
    });
    match user {
        Some(user) => nav.child::<Span, _>(|s| {
            s.child::<A, _>(|a| a.attr("href", &user.html_url).text(&user.login))
                .text(" ")
                .child::<A, _>(|a| a.attr("href", "/oauth/signout").text("Sign out"))
        }),
        None => nav.child::<A, _>(|a| {
            a.attr("href", "/oauth/signin")
                .text("Sign in with GitHub")
        }),
    }
}

/// Renders the home page with the link creation form.
pub fn render_home(user: Option<&GitHubUser>) -> String {
    let greeting = match user {
        Some(user) => format!("Welcome back, {}!", user.login),
        None => "Hi Mom!".to_string(),
    };

    let content = Element::<Div>::new()
        .class("card")
        .child::<H1, _>(|h| h.text(&greeting))
        .child::<P, _>(|p| p.class("muted").text("Paste a long URL to get a short one."))
        .child::<Form, _>(|f| {
            f.attr("method", "POST")
                .attr("action", "/links")
                .child::<Label, _>(|l| l.attr("for", "longUrl").text("Long URL"))
                .child::<Input, _>(|i| {
                    i.attr("type", "url")
                        .id("longUrl")
                        .attr("name", "longUrl")
                        .attr("placeholder", "https://example.com/a/very/long/path")
                        .bool_attr("required")
                })
                .child::<Button, _>(|b| b.attr("type", "submit").text("Shorten"))
        })
        .render();

    render_page("Home", user, &content)
}

/// Renders the page describing a stored link.
pub fn render_link(link: &ShortLink, user: Option<&GitHubUser>) -> String {
    let short_path = format!("/s/{}", link.short_code);
    let clicks = format!("{} click(s)", link.click_count);
    let created_by = format!("Created by {}", link.user_id);

    let content = Element::<Div>::new()
        .class("card")
        .child::<H2, _>(|h| h.child::<Code, _>(|c| c.text(&link.short_code)))
        .child::<P, _>(|p| {
            p.text("Short link: ")
                .child::<A, _>(|a| a.attr("href", &short_path).text(&short_path))
        })
        .child::<P, _>(|p| {
            p.text("Goes to: ")
                .child::<A, _>(|a| a.attr("href", &link.long_url).text(&link.long_url))
        })
        .child::<P, _>(|p| p.class("muted").text(&clicks))
        .child::<P, _>(|p| p.class("muted").text(&created_by))
        .when(link.last_click_event.is_some(), |d| {
            let last = format!(
                "Last visited {}",
                link.last_click_event.as_deref().unwrap_or_default()
            );
            d.child::<P, _>(|p| p.class("muted").text(&last))
        })
        .render();

    render_page(&link.short_code, user, &content)
}

/// Renders the page shown for unknown links.
pub fn render_not_found(user: Option<&GitHubUser>) -> String {
    let content = Element::<Div>::new()
        .class("card")
        .child::<H1, _>(|h| h.text("Not found"))
        .child::<P, _>(|p| {
            p.text("No link with that code exists. ")
                .child::<A, _>(|a| a.attr("href", "/").text("Create one"))
        })
        .render();

    render_page("Not found", user, &content)
}
