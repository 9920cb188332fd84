pub mod pronunciation;
