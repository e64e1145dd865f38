use attendance_ledger::{
    AppState, AttendanceBand, ClassWithStudents, JsonFileStore, KeyValueStore, LedgerConfig,
    UserManager, export_to_csv, ledger, load_config_from_json, log_in, sign_up,
};
use chrono::NaiveDate;
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "cli", version, about = "Class roster and attendance tracker")]
struct Args {
    /// Key-value store file. `.db`/`.sqlite` uses SQLite, anything else JSON.
    #[arg(long, default_value = "attendance_store.json")]
    store: PathBuf,

    /// Optional JSON ledger configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Date to start marking on (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  signup <user> <pass> <confirm>     Create an account and log in\n  login <user> <pass>                Log in\n  logout                             Log out\n  classes                            List classes\n  class add <name...>                Add a class\n  class remove <id>                  Remove a class\n  select <id|name>                   Open a class\n  unselect                           Close the open class\n  date <YYYY-MM-DD>                  Change the marking date\n  show                               Show roster and status for the date\n  student add <email> <name...>      Enroll a student\n  student remove <id>                Remove a student and their attendance\n  student info <id>                  Show a student's attendance history\n  search <query...>                  Find students by name\n  present <id>                       Mark a student present\n  absent <id>                        Mark a student absent\n  all                                Mark every student present\n  history                            Show attendance records, newest first\n  unrecord <YYYY-MM-DD>              Delete the record for a date\n  export <dir>                       Write the attendance CSV into <dir>\n  save                               Save classes\n  quit|exit                          Exit"
    );
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

struct Shell<S> {
    users: UserManager<S>,
    config: LedgerConfig,
    today: NaiveDate,
    state: Option<AppState>,
}

impl<S: KeyValueStore> Shell<S> {
    fn new(users: UserManager<S>, config: LedgerConfig, today: NaiveDate) -> Self {
        Self {
            users,
            config,
            today,
            state: None,
        }
    }

    fn logged_in(&self) -> Option<&AppState> {
        if self.state.is_none() {
            println!("Not logged in.");
        }
        self.state.as_ref()
    }

    fn selected(&self) -> Option<(&AppState, &ClassWithStudents)> {
        let state = self.logged_in()?;
        match state.selected() {
            Some(class) => Some((state, class)),
            None => {
                println!("No class selected.");
                None
            }
        }
    }

    /// Keeps `next` as the current state and writes its classes to the store.
    fn commit(&mut self, next: AppState) {
        if let Err(e) = next.save(&self.users) {
            println!("Error saving classes: {}", e);
        }
        self.state = Some(next);
    }

    fn start_session(&mut self, username: &str) {
        match AppState::load(&self.users, username, self.today) {
            Ok(state) => {
                println!(
                    "Logged in as {} ({} classes).",
                    username,
                    state.classes().len()
                );
                self.state = Some(state);
            }
            Err(e) => println!("Error loading classes: {}", e),
        }
    }

    fn print_classes(&self) {
        let Some(state) = self.logged_in() else {
            return;
        };
        if state.classes().is_empty() {
            println!("No classes.");
            return;
        }
        let selected_id = state.selected().map(|c| c.class_id.as_str());
        for class in state.classes() {
            let marker = if Some(class.class_id.as_str()) == selected_id {
                "*"
            } else {
                " "
            };
            println!(
                "{} {}  {}  students={} records={}",
                marker,
                class.class_id,
                class.class_name,
                class.students.len(),
                class.attendance_records.len()
            );
        }
    }

    fn print_roster(&self) {
        let Some((state, class)) = self.selected() else {
            return;
        };
        let date = state.selected_date();
        let record = ledger::record_for_date(class, date);
        let pct = ledger::date_attendance_percentage(class, date);
        println!("{}  date={}", class.class_name, date);
        println!(
            "Attendance: {}% ({})",
            ledger::display_percentage(pct),
            AttendanceBand::classify(pct, &self.config)
        );
        for student in &class.students {
            println!(
                "  {:<8} {}  {}  {}",
                record.status_for(&student.id).as_str(),
                student.id,
                student.name,
                student.email
            );
        }
    }

    fn print_student(&self, student_id: &str) {
        let Some((_, class)) = self.selected() else {
            return;
        };
        let Some(student) = class.student(student_id) else {
            println!("Student {student_id} not found.");
            return;
        };
        let pct = ledger::student_attendance_percentage(class, student_id);
        println!("{} <{}>", student.name, student.email);
        println!(
            "Overall Attendance: {}% ({})",
            ledger::display_percentage(pct),
            AttendanceBand::classify(pct, &self.config)
        );
        for (date, status) in ledger::student_history(class, student_id) {
            println!("  {}  {}", date, status);
        }
    }

    fn print_history(&self) {
        let Some((_, class)) = self.selected() else {
            return;
        };
        let history = ledger::attendance_history(class);
        if history.is_empty() {
            println!("No attendance records.");
            return;
        }
        for record in history {
            let pct = ledger::date_attendance_percentage(class, record.date);
            println!("  {}  {}%", record.date, ledger::display_percentage(pct));
        }
        let overall = ledger::overall_class_attendance(class);
        println!("Overall: {}%", ledger::display_percentage(overall));
    }

    /// Returns `false` when the loop should stop.
    fn handle(&mut self, input: &str) -> bool {
        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        match (cmd, args.as_slice()) {
            ("help", _) => print_help(),
            ("quit" | "exit", _) => return false,
            ("signup", [user, pass, confirm]) => {
                match sign_up(&self.users, user, pass, confirm) {
                    Ok(()) => self.start_session(user),
                    Err(e) => println!("Error: {}", e),
                }
            }
            ("signup", _) => println!("Usage: signup <user> <pass> <confirm>"),
            ("login", [user, pass]) => match log_in(&self.users, user, pass) {
                Ok(()) => self.start_session(user),
                Err(e) => println!("Error: {}", e),
            },
            ("login", _) => println!("Usage: login <user> <pass>"),
            ("logout", _) => {
                self.state = None;
                println!("Logged out.");
            }
            ("classes", _) => self.print_classes(),
            ("class", ["add", name @ ..]) if !name.is_empty() => {
                let Some(state) = self.logged_in() else {
                    return true;
                };
                match state.add_class(&name.join(" ")) {
                    Ok(next) => {
                        if let Some(class) = next.classes().last() {
                            println!("Added class {} ({}).", class.class_name, class.class_id);
                        }
                        self.commit(next);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            ("class", ["remove", id]) => {
                let Some(state) = self.logged_in() else {
                    return true;
                };
                let next = state.remove_class(id);
                println!("Removed class {id}.");
                self.commit(next);
            }
            ("class", _) => println!("Usage: class add <name...> | class remove <id>"),
            ("select", [_, ..]) => {
                let Some(state) = self.logged_in() else {
                    return true;
                };
                let wanted = args.join(" ");
                let found = state
                    .classes()
                    .iter()
                    .find(|c| c.class_id == wanted || c.class_name == wanted)
                    .map(|c| c.class_id.clone());
                match found {
                    Some(id) => {
                        self.state = Some(state.select_class(&id));
                        self.print_roster();
                    }
                    None => println!("Class {wanted} not found."),
                }
            }
            ("select", _) => println!("Usage: select <id|name>"),
            ("unselect", _) => {
                if let Some(state) = self.logged_in() {
                    self.state = Some(state.clear_selection());
                }
            }
            ("date", [date_s]) => {
                let Some(date) = parse_date(date_s) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    return true;
                };
                if let Some(state) = self.logged_in() {
                    self.state = Some(state.select_date(date));
                    println!("Date set to {date}.");
                }
            }
            ("date", _) => println!("Usage: date <YYYY-MM-DD>"),
            ("show", _) => self.print_roster(),
            ("student", ["add", email, name @ ..]) if !name.is_empty() => {
                let Some((state, _)) = self.selected() else {
                    return true;
                };
                let name = name.join(" ");
                match state.try_apply(|cls| {
                    ledger::add_student_with_config(cls, &name, email, &self.config)
                }) {
                    Ok(next) => {
                        println!("Student added.");
                        self.commit(next);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            ("student", ["remove", id]) => {
                let Some((state, _)) = self.selected() else {
                    return true;
                };
                let next = state.apply(|cls| ledger::remove_student(cls, id));
                println!("Removed student {id}.");
                self.commit(next);
            }
            ("student", ["info", id]) => self.print_student(id),
            ("student", _) => println!(
                "Usage: student add <email> <name...> | student remove <id> | student info <id>"
            ),
            ("search", _) => {
                let Some((_, class)) = self.selected() else {
                    return true;
                };
                let matches = ledger::search_students(class, &args.join(" "));
                if matches.is_empty() {
                    println!("No students match.");
                }
                for student in matches {
                    println!("  {}  {}  {}", student.id, student.name, student.email);
                }
            }
            ("present" | "absent", [id]) => {
                let Some((state, class)) = self.selected() else {
                    return true;
                };
                if class.student(id).is_none() {
                    println!("No student with id {id}.");
                    return true;
                }
                let date = state.selected_date();
                let present = cmd == "present";
                let next = state.apply(|cls| ledger::set_attendance(cls, date, id, present));
                println!("Marked {id} {cmd} on {date}.");
                self.commit(next);
            }
            ("present" | "absent", _) => println!("Usage: {} <id>", cmd),
            ("all", _) => {
                let Some((state, _)) = self.selected() else {
                    return true;
                };
                let date = state.selected_date();
                let next = state.apply(|cls| ledger::mark_all_present(cls, date));
                println!("Marked all present on {date}.");
                self.commit(next);
            }
            ("history", _) => self.print_history(),
            ("unrecord", [date_s]) => {
                let Some(date) = parse_date(date_s) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    return true;
                };
                let Some((state, _)) = self.selected() else {
                    return true;
                };
                let next = state.apply(|cls| ledger::remove_attendance_record(cls, date));
                println!("Removed record for {date}.");
                self.commit(next);
            }
            ("unrecord", _) => println!("Usage: unrecord <YYYY-MM-DD>"),
            ("export", [dir]) => {
                let Some((_, class)) = self.selected() else {
                    return true;
                };
                match export_to_csv(class, dir) {
                    Ok(path) => println!("Exported to {}", path.display()),
                    Err(e) => println!("Export error: {}", e),
                }
            }
            ("export", _) => println!("Usage: export <dir>"),
            ("save", _) => {
                let Some(state) = self.logged_in() else {
                    return true;
                };
                match state.save(&self.users) {
                    Ok(()) => println!("Saved."),
                    Err(e) => println!("Error saving classes: {}", e),
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
        true
    }

    fn run(&mut self) {
        println!("Attendance (CLI) - type 'help' for commands\n");

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("> ");
            let _ = io::stdout().flush();
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if !self.handle(input) {
                break;
            }
        }
    }
}

fn is_sqlite_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("db" | "sqlite")
    )
}

#[cfg(feature = "sqlite")]
fn run_sqlite(path: &Path, config: LedgerConfig, today: NaiveDate) {
    match attendance_ledger::SqliteStore::new(path) {
        Ok(store) => Shell::new(UserManager::new(store), config, today).run(),
        Err(e) => {
            eprintln!("Failed to open {}: {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "sqlite"))]
fn run_sqlite(path: &Path, _config: LedgerConfig, _today: NaiveDate) {
    eprintln!(
        "Cannot open {}: rebuild with the `sqlite` feature to use SQLite stores.",
        path.display()
    );
    std::process::exit(1);
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config_from_json(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LedgerConfig::default(),
    };
    let today = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    if is_sqlite_path(&args.store) {
        run_sqlite(&args.store, config, today);
        return;
    }

    match JsonFileStore::open(&args.store) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "using json store");
            Shell::new(UserManager::new(store), config, today).run()
        }
        Err(e) => {
            eprintln!("Failed to open {}: {}", args.store.display(), e);
            std::process::exit(1);
        }
    }
}
