fn main() {
    example::run();
}
