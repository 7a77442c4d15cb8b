mod common;

use common::{config, departure, listing, provider_with};
use flight_checker::app::{App, Flow, MenuChoice};
use flight_checker::console::Console;
use mockito::Matcher;
use std::io::Cursor;

/// Replays `input` against a session talking to `base_url` and returns
/// everything it printed.
async fn replay(base_url: &str, input: impl AsRef<[u8]>) -> String {
    let config = config(base_url);
    let provider = provider_with(&config);
    let console = Console::new(Cursor::new(input.as_ref().to_vec()), Vec::new(), false);
    let mut app = App::new(console, provider, config);
    app.run().await.unwrap();
    String::from_utf8(app.into_console().into_output()).unwrap()
}

const TERM_TOO_SHORT: &str = "Search term must be at least 3 characters long. Please try again!";

fn nbo_search_hit() -> String {
    serde_json::json!({
        "count": 1,
        "items": [{ "name": "Jomo Kenyatta", "iata": "NBO", "icao": "HKJK", "countryCode": "KE" }]
    })
    .to_string()
}

fn position(output: &str, needle: &str) -> usize {
    output
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in:\n{output}"))
}

#[tokio::test]
async fn menu_rejects_bad_choices_and_exits() {
    let server = mockito::Server::new_async().await;
    let output = replay(&server.url(), "abc\n9\n3\n6\n7\n").await;

    assert!(output.contains("1. Search for Airports"));
    assert!(output.contains("7. Exit"));
    assert!(output.contains("You did not enter a valid number. Please try again."));
    assert!(output.contains("There is no option 9 in the menu. Please try again."));
    assert!(output.contains("'Search for Flights by Flight Number' is not yet available."));
    assert!(output.contains("'Check Flight Status' is not yet available."));
    assert!(output.trim_end().ends_with("Goodbye!"));
}

#[tokio::test]
async fn closed_input_ends_the_session() {
    let server = mockito::Server::new_async().await;
    let output = replay(&server.url(), "1\n").await;
    assert!(output.trim_end().ends_with("Goodbye!"));
}

#[tokio::test]
async fn short_search_term_is_rejected_without_a_request() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", "/airports/search/term")
        .match_query(Matcher::UrlEncoded("q".into(), "Nairobi".into()))
        .with_status(200)
        .with_body(nbo_search_hit())
        .expect(1)
        .create_async()
        .await;

    let output = replay(&server.url(), "1\nab\nNairobi\nn\n7\n").await;

    search.assert_async().await;
    let rejected = position(&output, TERM_TOO_SHORT);
    let found = position(&output, "1. NBO/HKJK - Jomo Kenyatta, KE");
    assert!(rejected < found);
    assert!(output.contains("Exiting the search."));
}

#[tokio::test]
async fn undecodable_input_line_is_rejected_not_fatal() {
    let mut server = mockito::Server::new_async().await;
    let search = server
        .mock("GET", "/airports/search/term")
        .match_query(Matcher::UrlEncoded("q".into(), "Nai".into()))
        .with_status(200)
        .with_body(nbo_search_hit())
        .expect(1)
        .create_async()
        .await;

    let mut input = b"1\n".to_vec();
    input.extend_from_slice(&[0xff, 0xfe, b'\n']);
    input.extend_from_slice(b"Nai\nn\n7\n");
    let output = replay(&server.url(), input).await;

    search.assert_async().await;
    let rejected = position(&output, TERM_TOO_SHORT);
    let found = position(&output, "1. NBO/HKJK - Jomo Kenyatta, KE");
    assert!(rejected < found);
    assert!(output.trim_end().ends_with("Goodbye!"));
}

#[tokio::test]
async fn empty_search_offers_a_retry() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/airports/search/term")
        .match_query(Matcher::UrlEncoded("q".into(), "Nairobi".into()))
        .with_status(200)
        .with_body(r#"{"count":0,"items":[]}"#)
        .create_async()
        .await;
    let retry = server
        .mock("GET", "/airports/search/term")
        .match_query(Matcher::UrlEncoded("q".into(), "Mombasa".into()))
        .with_status(200)
        .with_body(
            r#"{"count":1,"items":[{"name":"Moi","iata":"MBA","icao":"HKMO","countryCode":"KE"}]}"#,
        )
        .create_async()
        .await;

    let output = replay(&server.url(), "1\nNairobi\ny\nMombasa\nn\n7\n").await;

    retry.assert_async().await;
    let none = position(&output, "No airports were found for your search term.");
    let again = position(&output, "Would you like to search again? (y/n): ");
    let found = position(&output, "1. MBA/HKMO - Moi, KE");
    assert!(none < again && again < found);
}

#[tokio::test]
async fn transport_failure_leads_to_retry_decision() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/airports/search/term")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let output = replay(&server.url(), "1\nNairobi\nn\n7\n").await;

    let failed = position(&output, "Could not get data from the flight data service:");
    assert!(output.contains("HTTP 502: bad gateway"));
    let offered = position(&output, "Would you like to search again? (y/n): ");
    assert!(failed < offered);
    assert!(output.contains("Exiting the search."));
}

#[tokio::test]
async fn airport_details_are_printed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/airports/iata/NBO")
        .with_status(200)
        .with_body(
            r#"{
                "fullName": "Nairobi Jomo Kenyatta",
                "iata": "NBO",
                "icao": "HKJK",
                "country": { "code": "KE", "name": "Kenya" },
                "municipalityName": "Nairobi",
                "timeZone": "Africa/Nairobi",
                "urls": { "webSite": "http://www.kaa.go.ke/" }
            }"#,
        )
        .create_async()
        .await;

    let output = replay(&server.url(), "2\nnbo\nn\n7\n").await;

    for expected in [
        "Airport Details (matched as IATA code):",
        "Name: Nairobi Jomo Kenyatta",
        "ICAO: HKJK",
        "Country: Kenya",
        "City: Nairobi",
        "Time zone: Africa/Nairobi",
        "Website: http://www.kaa.go.ke/",
        "Exiting the airport details view.",
    ] {
        assert!(output.contains(expected), "{expected:?} missing from:\n{output}");
    }
}

#[tokio::test]
async fn unknown_airport_is_reported_and_loop_continues() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server.mock("GET", "/airports/iata/QQQ").with_status(204).create_async().await;
    let _mock = server.mock("GET", "/airports/icao/QQQ").with_status(204).create_async().await;

    let output = replay(&server.url(), "2\nQQ\nQQQ\nn\n7\n").await;

    assert!(output.contains("Airport code must be at least 3 characters long. Please try again!"));
    assert!(output.contains(
        "Could not find an airport with code QQQ. Please check the code and try again."
    ));
}

#[tokio::test]
async fn route_without_matches_reports_no_route_after_a_failed_half() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/flights/airports/iata/IAD/2024-05-01T00:00/2024-05-01T11:59")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/flights/airports/iata/IAD/2024-05-01T12:00/2024-05-01T23:59")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing(vec![departure("UA 9", "ORD", "Chicago", "2024-05-01 15:00-04:00")]))
        .create_async()
        .await;

    let output = replay(&server.url(), "4\nIAD\n2024-05-01\nIAD\n05/01/2024\njfk\nn\n7\n").await;

    assert!(output
        .contains("'2024-05-01' is not a valid date, expected MM/DD/YYYY. Please try again!"));
    assert!(output.contains("Departures between 00:00-11:59 could not be searched."));
    assert!(output.contains("No route available from IAD to JFK on 05/01/2024 (0 flights found)."));
    assert!(output.contains("Exiting the route search."));
}

#[tokio::test]
async fn route_matches_are_listed_with_twelve_hour_times() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/flights/airports/iata/IAD/2024-05-01T00:00/2024-05-01T11:59")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing(vec![departure("UA 1", "JFK", "New York", "2024-05-01 00:05-04:00")]))
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/flights/airports/iata/IAD/2024-05-01T12:00/2024-05-01T23:59")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing(vec![departure("AA 2", "JFK", "New York", "2024-05-01 12:30-04:00")]))
        .create_async()
        .await;

    let output = replay(&server.url(), "4\nIAD\n05/01/2024\nJFK\nn\n7\n").await;

    let heading = position(&output, "Found 2 flights from IAD to JFK on 05/01/2024:");
    let first = position(&output, "1. UA 1 departs 12:05 AM (Test Air) - Expected [Terminal B]");
    let second = position(&output, "2. AA 2 departs 12:30 PM (Test Air) - Expected [Terminal B]");
    assert!(heading < first && first < second);
}

#[tokio::test]
async fn departures_view_lists_at_most_five() {
    let mut server = mockito::Server::new_async().await;
    let entries = (1..=8)
        .map(|n| departure(&format!("KQ {n}"), "LHR", "London", "2024-05-01 23:05+03:00"))
        .collect();
    let _mock = server
        .mock("GET", "/flights/airports/icao/HKJK")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(listing(entries))
        .create_async()
        .await;

    let output = replay(&server.url(), "5\nhkjk\nn\n7\n").await;

    assert!(output.contains("Next departures from HKJK:"));
    assert!(output.contains("5. KQ 5 to London at 11:05 PM"));
    assert!(!output.contains("KQ 6"));
    assert!(output.contains("Exiting the departures view."));
}

#[tokio::test]
async fn exit_choice_quits_directly() {
    let server = mockito::Server::new_async().await;
    let config = config(&server.url());
    let provider = provider_with(&config);
    let console = Console::new(Cursor::new(String::new()), Vec::new(), false);
    let mut app = App::new(console, provider, config);

    assert_eq!(app.handle_choice(MenuChoice::Exit).await.unwrap(), Flow::Quit);
    assert_eq!(app.handle_choice(MenuChoice::FlightStatus).await.unwrap(), Flow::Continue);
}
