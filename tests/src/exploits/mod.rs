//! Attack simulations: other content on the page forging traffic.
