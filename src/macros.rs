//! Declarative macros that generate descriptors and proxy stand-ins.
//!
//! Operation parameters must be owned `Serialize + DeserializeOwned` types
//! and every operation returns [`crate::Result`].

/// Build an [`Arguments`](crate::Arguments) list from expressions.
///
/// Evaluates to `Result<Arguments>`; encoding failures surface as
/// [`InterceptError::Codec`](crate::InterceptError::Codec).
///
/// ```ignore
/// let total: u64 = proxy.call("add", args![2u64, 3u64]?)?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::core::result::Result::<$crate::Arguments, $crate::InterceptError>::Ok(
            $crate::Arguments::new(),
        )
    };
    ($($arg:expr),+ $(,)?) => {
        (|| -> $crate::Result<$crate::Arguments> {
            let mut arguments = $crate::Arguments::new();
            $(arguments.push(&$arg)?;)+
            ::core::result::Result::Ok(arguments)
        })()
    };
}

/// Declare a contract trait that can be proxied with the contract-based
/// strategy.
///
/// Generates the trait itself, `Reflect for dyn Trait`, `Introspect for
/// dyn Trait`, and `Trait for Proxy<dyn Trait>`.
///
/// ```ignore
/// contract! {
///     /// User persistence.
///     pub trait UserRepository {
///         fn save(&self, user: User) -> Result<()>;
///         fn find(&self, id: u64) -> Result<Option<User>>;
///     }
/// }
///
/// let repo: Arc<dyn UserRepository> = Arc::new(InMemoryUsers::default());
/// let proxy = factory.build(repo)?;
/// proxy.save(user)?;
/// ```
#[macro_export]
macro_rules! contract {
    (
        $(#[$meta:meta])*
        $vis:vis trait $name:ident {
            $(
                $(#[$op_meta:meta])*
                fn $op:ident(&self $(, $arg:ident : $ty:ty)* $(,)?) -> $ret:ty;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $name: ::core::marker::Send + ::core::marker::Sync {
            $(
                $(#[$op_meta])*
                fn $op(&self $(, $arg: $ty)*) -> $ret;
            )*

            #[doc(hidden)]
            fn __interpose_strategy(&self) -> ::core::option::Option<$crate::ProxyStrategy> {
                ::core::option::Option::None
            }
        }

        impl $crate::Reflect for dyn $name {
            fn descriptor() -> $crate::TypeDescriptor<Self> {
                $crate::TypeDescriptor::contract(::core::stringify!($name))
                $(
                    .operation(
                        $crate::OperationId::new(
                            ::core::stringify!($op),
                            &[$(::core::stringify!($ty)),*],
                        ),
                        |target: &Self, arguments: &$crate::Arguments| {
                            #[allow(unused_mut, unused_variables)]
                            let mut decoder = arguments.decoder();
                            $(let $arg: $ty = decoder.next()?;)*
                            let output = target.$op($($arg),*)?;
                            $crate::encode(&output)
                        },
                    )
                )*
            }
        }

        impl $crate::Introspect for dyn $name {
            fn proxy_strategy(&self) -> ::core::option::Option<$crate::ProxyStrategy> {
                <Self as $name>::__interpose_strategy(self)
            }
        }

        impl $name for $crate::Proxy<dyn $name> {
            $(
                fn $op(&self $(, $arg: $ty)*) -> $ret {
                    #[allow(unused_mut)]
                    let mut arguments = $crate::Arguments::new();
                    $(arguments.push(&$arg)?;)*
                    $crate::Proxy::call(self, ::core::stringify!($op), arguments)
                }
            )*

            fn __interpose_strategy(&self) -> ::core::option::Option<$crate::ProxyStrategy> {
                ::core::option::Option::Some($crate::Proxy::strategy(self))
            }
        }
    };
}

/// Declare the proxiable operations of a concrete type, to be proxied with
/// the concrete (subclass-based) strategy.
///
/// The listed operations must exist as inherent methods of the type. The
/// macro generates an operations trait implemented by both the type and
/// `Proxy<Type>`, plus `Reflect` and `Introspect` for the type. Operations
/// in the optional `sealed` block are part of the type's descriptor but
/// cannot be overridden, so building a proxy for the type fails.
///
/// ```ignore
/// concrete! {
///     pub trait OrderOps for OrderService {
///         fn place(&self, order: Order) -> Result<Receipt>;
///     }
///     sealed {
///         fn audit(&self) -> Result<u64>;
///     }
/// }
/// ```
#[macro_export]
macro_rules! concrete {
    (
        $(#[$meta:meta])*
        $vis:vis trait $ops:ident for $name:ident {
            $(
                $(#[$op_meta:meta])*
                fn $op:ident(&self $(, $arg:ident : $ty:ty)* $(,)?) -> $ret:ty;
            )*
        }
        $(
            sealed {
                $(
                    fn $sop:ident(&self $(, $sarg:ident : $sty:ty)* $(,)?) -> $sret:ty;
                )*
            }
        )?
    ) => {
        $(#[$meta])*
        $vis trait $ops {
            $(
                $(#[$op_meta])*
                fn $op(&self $(, $arg: $ty)*) -> $ret;
            )*
        }

        impl $ops for $name {
            $(
                fn $op(&self $(, $arg: $ty)*) -> $ret {
                    $name::$op(self $(, $arg)*)
                }
            )*
        }

        impl $ops for $crate::Proxy<$name> {
            $(
                fn $op(&self $(, $arg: $ty)*) -> $ret {
                    #[allow(unused_mut)]
                    let mut arguments = $crate::Arguments::new();
                    $(arguments.push(&$arg)?;)*
                    $crate::Proxy::call(self, ::core::stringify!($op), arguments)
                }
            )*
        }

        impl $crate::Reflect for $name {
            fn descriptor() -> $crate::TypeDescriptor<Self> {
                $crate::TypeDescriptor::concrete(::core::stringify!($name))
                $(
                    .operation(
                        $crate::OperationId::new(
                            ::core::stringify!($op),
                            &[$(::core::stringify!($ty)),*],
                        ),
                        |target: &Self, arguments: &$crate::Arguments| {
                            #[allow(unused_mut, unused_variables)]
                            let mut decoder = arguments.decoder();
                            $(let $arg: $ty = decoder.next()?;)*
                            let output = $name::$op(target $(, $arg)*)?;
                            $crate::encode(&output)
                        },
                    )
                )*
                $($(
                    .sealed_operation(
                        $crate::OperationId::new(
                            ::core::stringify!($sop),
                            &[$(::core::stringify!($sty)),*],
                        ),
                        |target: &Self, arguments: &$crate::Arguments| {
                            #[allow(unused_mut, unused_variables)]
                            let mut decoder = arguments.decoder();
                            $(let $sarg: $sty = decoder.next()?;)*
                            let output: $sret = $name::$sop(target $(, $sarg)*);
                            $crate::encode(&output?)
                        },
                    )
                )*)?
            }
        }

        impl $crate::Introspect for $name {}
    };
}
