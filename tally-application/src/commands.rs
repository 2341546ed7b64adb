pub mod aggregate_commands;
