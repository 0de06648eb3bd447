fn main() {
    if let Err(e) = subscription_calendar_lib::run() {
        log::error!("{}", e.details());
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}
