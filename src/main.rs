fn main() {
    seqform::cli::run();
}
