use fnrouter::{
    dispatcher::{handler_fn, Handler, HandlerResponse},
    path::format_path,
    router::Router,
    RouterError,
};

fn ok() -> impl Handler + 'static {
    handler_fn(|_| Ok(HandlerResponse::text(200, "ok")))
}

/// Verb zoo: every shortcut, a group and a parameterized route.
fn zoo_router() -> Router {
    let mut router = Router::new();
    router.get("/", ok()).unwrap();
    router
        .group("/zoo", |zoo| {
            zoo.get("/animals", ok())?;
            zoo.post("/animals", ok())?;
            zoo.get("/animals/{id}", ok())?;
            zoo.put("/animals/{id}", ok())?;
            zoo.patch("/animals/{id}", ok())?;
            zoo.delete("/animals/{id}", ok())?;
            Ok(())
        })
        .unwrap();
    router
}

fn assert_route_match(router: &Router, method: &str, path: &str, expected_route: &str) {
    match router.resolve(method, path) {
        Ok(m) => {
            println!("✅ {} {} → {}", method, path, m.route.full_path());
            assert_eq!(
                m.route.full_path(),
                expected_route,
                "Route mismatch for {} {}",
                method,
                path
            );
        }
        Err(e) => {
            println!("❌ {} {} → {}", method, path, e);
            assert_eq!(
                expected_route, "<none>",
                "Expected route to match for {} {}",
                method, path
            );
        }
    }
}

#[test]
fn test_router_root() {
    assert_route_match(&zoo_router(), "GET", "/", "/");
}

#[test]
fn test_router_verbs() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/zoo/animals", "/zoo/animals");
    assert_route_match(&router, "POST", "/zoo/animals", "/zoo/animals");
    assert_route_match(&router, "GET", "/zoo/animals/123", "/zoo/animals/{id}");
    assert_route_match(&router, "PUT", "/zoo/animals/123", "/zoo/animals/{id}");
    assert_route_match(&router, "PATCH", "/zoo/animals/123", "/zoo/animals/{id}");
    assert_route_match(&router, "DELETE", "/zoo/animals/123", "/zoo/animals/{id}");
}

#[test]
fn test_router_method_case_insensitive() {
    let router = zoo_router();
    assert_route_match(&router, "get", "/zoo/animals", "/zoo/animals");
    assert_route_match(&router, " Delete ", "/zoo/animals/9", "/zoo/animals/{id}");
}

#[test]
fn test_router_unknown_paths() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/zoo/unknown", "<none>");
    assert_route_match(&router, "POST", "/zoo/animals/1", "<none>");
    assert_route_match(&router, "GET", "/zoo/animals/1/extra", "<none>");
    assert_route_match(&router, "HEAD", "/zoo/animals", "<none>");
}

#[test]
fn test_trailing_slash_and_query_are_ignored() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/zoo/animals/", "/zoo/animals");
    assert_route_match(&router, "GET", "/zoo/animals?sort=name", "/zoo/animals");
    assert_route_match(&router, "GET", "/zoo/animals/5/?a=1&b=2", "/zoo/animals/{id}");
}

#[test]
fn test_prefix_composition() {
    let mut router = Router::new();
    router.set_router_prefix("/api").unwrap();
    router
        .group("/admin", |admin| {
            admin.add_route("GET", "/users", ok())?;
            Ok(())
        })
        .unwrap();

    assert_eq!(router.routes()[0].full_path(), "/api/admin/users");
    assert_route_match(&router, "GET", "/api/admin/users", "/api/admin/users");
    assert_route_match(&router, "GET", "/admin/users", "<none>");
    assert_route_match(&router, "GET", "/api/api/admin/users", "<none>");
}

#[test]
fn test_nested_groups_compose() {
    let mut router = Router::new();
    router
        .group("v1/", |v1| {
            v1.group("/teams/{team}", |teams| {
                teams.get("/members/{member}", ok())?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

    let m = router.resolve("GET", "/v1/teams/red/members/ann").unwrap();
    assert_eq!(m.route.full_path(), "/v1/teams/{team}/members/{member}");
    assert_eq!(m.get_path_param("team"), Some("red"));
    assert_eq!(m.get_path_param("member"), Some("ann"));
}

#[test]
fn test_first_match_wins_over_specificity() {
    let mut router = Router::new();
    router.get("/item/{id}", ok()).unwrap();
    router.get("/item/static", ok()).unwrap();

    let m = router.resolve("GET", "/item/static").unwrap();
    assert_eq!(m.route.full_path(), "/item/{id}");
    assert_eq!(m.get_path_param("id"), Some("static"));
}

#[test]
fn test_duplicate_routes_first_registered_wins() {
    let mut router = Router::new();
    router.get("/dup", handler_fn(|_| Ok(HandlerResponse::text(200, "first")))).unwrap();
    router.get("/dup", handler_fn(|_| Ok(HandlerResponse::text(200, "second")))).unwrap();
    assert_eq!(router.len(), 2);

    let m = router.resolve("GET", "/dup").unwrap();
    let first = &router.routes_for(&http::Method::GET)[0];
    assert!(std::ptr::eq(m.route, first));
}

#[test]
fn test_parameter_extraction_order() {
    let mut router = Router::new();
    router.get("/user/{id}/post/{slug}", ok()).unwrap();

    let m = router.resolve("GET", "/user/42/post/hello").unwrap();
    let params: Vec<(&str, &str)> = m
        .path_params
        .iter()
        .map(|(k, v)| (k.as_ref(), v.as_str()))
        .collect();
    assert_eq!(params, vec![("id", "42"), ("slug", "hello")]);

    let map = m.path_params_map();
    assert_eq!(map.get("id").map(String::as_str), Some("42"));
    assert_eq!(map.get("slug").map(String::as_str), Some("hello"));
}

#[test]
fn test_query_string_stripping() {
    let mut router = Router::new();
    router.get("/search", ok()).unwrap();
    let with_query = router.resolve("GET", "/search?q=test").unwrap();
    let without = router.resolve("GET", "/search").unwrap();
    assert!(std::ptr::eq(with_query.route, without.route));
    assert_eq!(with_query.path, "/search");
    assert!(with_query.path_params.is_empty());
}

#[test]
fn test_custom_fragment_constrains_match() {
    let mut router = Router::new();
    router.get(r"/orders/{id:\d+}", ok()).unwrap();
    router.get("/orders/{slug}", ok()).unwrap();

    assert_route_match(&router, "GET", "/orders/123", r"/orders/{id:\d+}");
    assert_route_match(&router, "GET", "/orders/latest", "/orders/{slug}");
}

#[test]
fn test_wildcard_fragment_spans_segments() {
    let mut router = Router::new();
    router.get("/static/{path:.+}", ok()).unwrap();
    let m = router.resolve("GET", "/static/css/site/main.css").unwrap();
    assert_eq!(m.get_path_param("path"), Some("css/site/main.css"));
}

#[test]
fn test_literal_dots_do_not_match_anything() {
    let mut router = Router::new();
    router.get("/feed.json", ok()).unwrap();
    assert_route_match(&router, "GET", "/feed.json", "/feed.json");
    assert_route_match(&router, "GET", "/feedxjson", "<none>");
}

#[test]
fn test_no_route_matched_carries_uri() {
    let router = zoo_router();
    match router.resolve("DELETE", "/nope") {
        Err(RouterError::NoRouteMatched { method, uri }) => {
            assert_eq!(method, "DELETE");
            assert_eq!(uri, "/nope");
        }
        other => panic!("expected NoRouteMatched, got {other:?}"),
    }
}

#[test]
fn test_malformed_registration_is_an_error() {
    let mut router = Router::new();
    let err = router.get("/users/{id", ok()).unwrap_err();
    assert!(matches!(err, RouterError::InvalidPattern { .. }));
    assert!(err.to_string().contains("/users/{id"));
    assert!(router.is_empty());
}

#[test]
fn test_format_path_idempotent_on_registered_paths() {
    for p in ["", "/", "a/b", "/a/b/", "\\a\\b\\", " /x/ ", "//"] {
        let once = format_path(p);
        assert_eq!(format_path(&once), once);
    }
}
