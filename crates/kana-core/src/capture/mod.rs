pub mod stroke;
