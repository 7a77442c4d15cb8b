use crate::api::FlightProvider;
use crate::config::Config;
use crate::console::Console;
use crate::error::InputError;
use crate::models::AirportCode;
use crate::queries;
use crate::schedule::parse_travel_date;
use crate::ui::{self, Line};
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

/// Entries of the main menu, numbered 1 to 7 in this order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MenuChoice {
    SearchAirports,
    AirportDetails,
    FlightByNumber,
    RouteSearch,
    Departures,
    FlightStatus,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::SearchAirports,
        MenuChoice::AirportDetails,
        MenuChoice::FlightByNumber,
        MenuChoice::RouteSearch,
        MenuChoice::Departures,
        MenuChoice::FlightStatus,
        MenuChoice::Exit,
    ];

    pub fn parse(input: &str) -> Result<Self, InputError> {
        let number: u32 = input.trim().parse().map_err(|_| InputError::NotANumber)?;
        number
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize))
            .copied()
            .ok_or(InputError::UnknownOption(number))
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::SearchAirports => "Search for Airports",
            MenuChoice::AirportDetails => "View Airport Details",
            MenuChoice::FlightByNumber => "Search for Flights by Flight Number",
            MenuChoice::RouteSearch => "Search for Flights by Route",
            MenuChoice::Departures => "View Departures at an Airport",
            MenuChoice::FlightStatus => "Check Flight Status",
            MenuChoice::Exit => "Exit",
        }
    }

    /// The lookup behind this entry, if it has one.
    fn operation(self) -> Option<Operation> {
        match self {
            MenuChoice::SearchAirports => Some(Operation::SearchAirports),
            MenuChoice::AirportDetails => Some(Operation::AirportDetails),
            MenuChoice::RouteSearch => Some(Operation::RouteSearch),
            MenuChoice::Departures => Some(Operation::Departures),
            MenuChoice::FlightByNumber | MenuChoice::FlightStatus | MenuChoice::Exit => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Operation {
    SearchAirports,
    AirportDetails,
    RouteSearch,
    Departures,
}

impl Operation {
    fn retry_question(self) -> &'static str {
        match self {
            Operation::SearchAirports => "Would you like to search again? (y/n): ",
            Operation::AirportDetails => "Would you like to look up another airport? (y/n): ",
            Operation::RouteSearch => "Would you like to search another route? (y/n): ",
            Operation::Departures => {
                "Would you like to view departures for another airport? (y/n): "
            }
        }
    }

    fn farewell(self) -> &'static str {
        match self {
            Operation::SearchAirports => "Exiting the search.",
            Operation::AirportDetails => "Exiting the airport details view.",
            Operation::RouteSearch => "Exiting the route search.",
            Operation::Departures => "Exiting the departures view.",
        }
    }
}

/// Validated input for one run of an operation.
#[derive(Debug, Clone, PartialEq)]
enum Request {
    SearchAirports(String),
    AirportDetails(AirportCode),
    RouteSearch { from: AirportCode, date: NaiveDate, to: AirportCode },
    Departures(AirportCode),
}

/// Where an operation's loop stands. Validation happens as input arrives, so
/// a rejected answer goes straight back to `AwaitingInput`; querying and
/// rendering always end in `AwaitingRetryDecision`.
#[derive(Debug, Clone, PartialEq)]
enum Stage {
    AwaitingInput,
    Querying(Request),
    AwaitingRetryDecision,
    Terminal,
}

/// What the menu does after an entry finishes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Quit,
}

// Reading one answer: either a value, a rejection, or closed input.
enum Answer<T> {
    Value(T),
    Rejected(InputError),
    Closed,
}

pub struct App<R, W> {
    console: Console<R, W>,
    provider: FlightProvider,
    config: Config,
    pub should_quit: bool,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(console: Console<R, W>, provider: FlightProvider, config: Config) -> Self {
        Self {
            console,
            provider,
            config,
            should_quit: false,
        }
    }

    /// Runs the menu until the user exits or input ends.
    pub async fn run(&mut self) -> io::Result<()> {
        self.console.blank()?;
        self.console.show(&Line::heading("Hello, welcome to flight-checker!"))?;
        self.console.show(&Line::plain("These are your options:"))?;

        while !self.should_quit {
            for (i, choice) in MenuChoice::ALL.iter().enumerate() {
                self.console.show(&Line::plain(format!("{}. {}", i + 1, choice.label())))?;
            }
            let Some(answer) = self.console.prompt("Your Choice: ")? else {
                self.should_quit = true;
                break;
            };
            match MenuChoice::parse(&answer) {
                Ok(choice) => {
                    if self.handle_choice(choice).await? == Flow::Quit {
                        self.should_quit = true;
                    }
                }
                Err(e) => {
                    self.console.blank()?;
                    self.console.show(&Line::error(format!("{e}. Please try again.")))?;
                }
            }
        }

        self.console.show(&Line::plain("Goodbye!"))?;
        Ok(())
    }

    pub async fn handle_choice(&mut self, choice: MenuChoice) -> io::Result<Flow> {
        info!("Menu choice: {}", choice.label());
        if choice == MenuChoice::Exit {
            return Ok(Flow::Quit);
        }
        let flow = match choice.operation() {
            Some(operation) => self.run_operation(operation).await?,
            None => {
                self.console
                    .show(&Line::notice(format!("'{}' is not yet available.", choice.label())))?;
                Flow::Continue
            }
        };
        self.console.blank()?;
        Ok(flow)
    }

    async fn run_operation(&mut self, operation: Operation) -> io::Result<Flow> {
        let mut stage = Stage::AwaitingInput;
        loop {
            debug!("{:?}: {:?}", operation, stage);
            stage = match stage {
                Stage::AwaitingInput => match self.read_request(operation)? {
                    Answer::Value(request) => Stage::Querying(request),
                    Answer::Rejected(e) => {
                        self.console.blank()?;
                        self.console.show(&Line::error(format!("{e}. Please try again!")))?;
                        self.console.blank()?;
                        Stage::AwaitingInput
                    }
                    Answer::Closed => return Ok(Flow::Quit),
                },
                Stage::Querying(request) => {
                    let lines = self.query(request).await;
                    self.console.show_all(&lines)?;
                    Stage::AwaitingRetryDecision
                }
                Stage::AwaitingRetryDecision => {
                    self.console.blank()?;
                    match self.console.confirm(operation.retry_question())? {
                        Some(true) => Stage::AwaitingInput,
                        Some(false) => {
                            self.console.show(&Line::plain(operation.farewell()))?;
                            Stage::Terminal
                        }
                        None => return Ok(Flow::Quit),
                    }
                }
                Stage::Terminal => return Ok(Flow::Continue),
            };
        }
    }

    fn read_request(&mut self, operation: Operation) -> io::Result<Answer<Request>> {
        let answer = match operation {
            Operation::SearchAirports => self
                .ask(
                    "Enter search term (city, or IATA code, or ICAO code): ",
                    queries::search_term,
                )?
                .map(Request::SearchAirports),
            Operation::AirportDetails => self
                .ask("Enter the IATA code or ICAO code of the airport: ", AirportCode::parse)?
                .map(Request::AirportDetails),
            Operation::Departures => self
                .ask(
                    "Enter the IATA code or ICAO code of the departure airport: ",
                    AirportCode::parse,
                )?
                .map(Request::Departures),
            Operation::RouteSearch => {
                let from = self.ask("Enter the departure airport code: ", AirportCode::parse)?;
                let from = match from {
                    Answer::Value(from) => from,
                    Answer::Rejected(e) => return Ok(Answer::Rejected(e)),
                    Answer::Closed => return Ok(Answer::Closed),
                };
                let date = self.ask("Enter the travel date (MM/DD/YYYY): ", parse_travel_date)?;
                let date = match date {
                    Answer::Value(date) => date,
                    Answer::Rejected(e) => return Ok(Answer::Rejected(e)),
                    Answer::Closed => return Ok(Answer::Closed),
                };
                self.ask("Enter the arrival airport code: ", AirportCode::parse)?
                    .map(|to| Request::RouteSearch { from, date, to })
            }
        };
        Ok(answer)
    }

    fn ask<T>(
        &mut self,
        label: &str,
        validate: impl Fn(&str) -> Result<T, InputError>,
    ) -> io::Result<Answer<T>> {
        Ok(match self.console.prompt(label)? {
            None => Answer::Closed,
            Some(raw) => match validate(&raw) {
                Ok(value) => Answer::Value(value),
                Err(e) => Answer::Rejected(e),
            },
        })
    }

    async fn query(&self, request: Request) -> Vec<Line> {
        match request {
            Request::SearchAirports(term) => {
                let limit = self.config.api.search_limit;
                match queries::search_airports(&self.provider, &term, limit).await {
                    Ok(airports) => ui::airport_list(&term, &airports),
                    Err(e) => vec![ui::api_error(&e)],
                }
            }
            Request::AirportDetails(code) => {
                let resolution = queries::resolve_airport(&self.provider, &code).await;
                ui::airport_resolution(&code, &resolution)
            }
            Request::RouteSearch { from, date, to } => {
                let report = queries::search_route(&self.provider, &from, date, &to).await;
                ui::route(&from, &to, date, &report)
            }
            Request::Departures(code) => {
                let shown = self.config.flights.departures_shown;
                match queries::list_departures(&self.provider, &code, shown).await {
                    Ok(departures) => ui::departures(&code, &departures),
                    Err(e) => vec![ui::api_error(&e)],
                }
            }
        }
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }
}

impl<T> Answer<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Answer<U> {
        match self {
            Answer::Value(v) => Answer::Value(f(v)),
            Answer::Rejected(e) => Answer::Rejected(e),
            Answer::Closed => Answer::Closed,
        }
    }
}
