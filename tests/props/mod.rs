mod consistency;
mod rounding;
