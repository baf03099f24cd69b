fn main() {
    report_console_lib::run()
}
