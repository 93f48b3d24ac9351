//! Bearer-token validation for the authenticated HTTP surface.

pub mod jwt;
